// File: ./src/filter.rs
// Sidebar filters folded into one inclusion test
use crate::model::{EntityKind, NormalizedEntity, Priority};
use crate::range::{DateRange, WeekStart, last_day_of_month, shift_date, week_start_of};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePreset {
    Today,
    ThisWeek,
    ThisMonth,
    Next7Days,
}

impl DatePreset {
    /// Concrete interval for this preset, anchored at `today`.
    pub fn resolve(self, today: NaiveDate, week_start: WeekStart) -> DateRange {
        match self {
            DatePreset::Today => DateRange::single(today),
            DatePreset::ThisWeek => {
                let start = week_start_of(today, week_start);
                DateRange {
                    start,
                    end: shift_date(start, 6),
                }
            }
            DatePreset::ThisMonth => DateRange {
                start: today.with_day(1).unwrap_or(today),
                end: last_day_of_month(today),
            },
            DatePreset::Next7Days => DateRange {
                start: today,
                end: shift_date(today, 6),
            },
        }
    }
}

impl FromStr for DatePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(DatePreset::Today),
            "week" | "this_week" => Ok(DatePreset::ThisWeek),
            "month" | "this_month" => Ok(DatePreset::ThisMonth),
            "next7" | "next_7_days" => Ok(DatePreset::Next7Days),
            other => Err(format!("Unknown date preset: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    All,
    Preset(DatePreset),
    /// Either side may be open.
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

/// Filter panel state. An empty `kinds` or `priorities` set places no
/// restriction on that dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub kinds: BTreeSet<EntityKind>,
    #[serde(default)]
    pub priorities: BTreeSet<Priority>,
    #[serde(default = "default_true")]
    pub include_completed: bool,
    #[serde(default)]
    pub date_range: DateFilter,
    #[serde(default)]
    pub week_start: WeekStart,
}

fn default_true() -> bool {
    true
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            kinds: BTreeSet::new(),
            priorities: BTreeSet::new(),
            include_completed: true,
            date_range: DateFilter::All,
            week_start: WeekStart::default(),
        }
    }
}

impl FilterState {
    /// Each predicate is a side-effect-free test on the same entity, so the
    /// evaluation order doesn't matter.
    pub fn matches(&self, entity: &NormalizedEntity, today: NaiveDate) -> bool {
        self.kind_passes(entity)
            && self.priority_passes(entity)
            && self.completion_passes(entity)
            && self.date_passes(entity, today)
    }

    /// `matches` anchored at the local current date.
    pub fn matches_now(&self, entity: &NormalizedEntity) -> bool {
        self.matches(entity, Local::now().date_naive())
    }

    /// Keeps matching entries in their original order.
    pub fn apply<'a>(
        &self,
        entities: &'a [NormalizedEntity],
        today: NaiveDate,
    ) -> Vec<&'a NormalizedEntity> {
        entities.iter().filter(|e| self.matches(e, today)).collect()
    }

    fn kind_passes(&self, entity: &NormalizedEntity) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&entity.kind)
    }

    fn priority_passes(&self, entity: &NormalizedEntity) -> bool {
        if entity.kind != EntityKind::Task || self.priorities.is_empty() {
            return true;
        }
        entity
            .priority
            .is_some_and(|p| self.priorities.contains(&p))
    }

    fn completion_passes(&self, entity: &NormalizedEntity) -> bool {
        self.include_completed || !entity.completed
    }

    fn date_passes(&self, entity: &NormalizedEntity, today: NaiveDate) -> bool {
        let window = match self.date_range {
            DateFilter::All => return true,
            DateFilter::Preset(p) => p.resolve(today, self.week_start),
            DateFilter::Custom { from, to } => {
                let start = from.unwrap_or(NaiveDate::MIN);
                let end = to.unwrap_or(NaiveDate::MAX);
                match DateRange::new(start, end) {
                    Ok(r) => r,
                    Err(err) => {
                        log::warn!("ignoring custom date filter: {}", err);
                        return true;
                    }
                }
            }
        };
        entity.range.overlaps(&window)
    }
}
