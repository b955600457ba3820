// File: ./src/occupancy.rs
// Which items land in which grid cell
use crate::model::{EntityKind, NormalizedEntity};
use crate::range::{Granularity, VisibleWindow};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Fixed hour row where multi-day items are marked on an hour grid,
/// so they don't fill every row of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorHours {
    pub sprint: u32,
    pub project: u32,
    pub task: u32,
}

impl Default for IndicatorHours {
    fn default() -> Self {
        Self {
            sprint: 1,
            project: 8,
            task: 9,
        }
    }
}

impl IndicatorHours {
    /// Events are placed by their own times and have no indicator row.
    pub fn for_kind(&self, kind: EntityKind) -> Option<u32> {
        match kind {
            EntityKind::Event => None,
            EntityKind::Sprint => Some(self.sprint),
            EntityKind::Project => Some(self.project),
            EntityKind::Task => Some(self.task),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyLimits {
    pub per_day_cap: usize,
    pub per_hour_cap: usize,
    pub indicator_hours: IndicatorHours,
}

impl Default for OccupancyLimits {
    fn default() -> Self {
        Self {
            per_day_cap: 3,
            per_hour_cap: 2,
            indicator_hours: IndicatorHours::default(),
        }
    }
}

/// Capped view of one cell. `overflow` is what the host shows as "+N more".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOccupancy<'a> {
    pub shown: Vec<&'a NormalizedEntity>,
    pub overflow: usize,
}

impl SlotOccupancy<'_> {
    pub fn total(&self) -> usize {
        self.shown.len() + self.overflow
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

/// Events, then tasks, sprints, projects; earlier start first; id breaks ties.
pub fn display_order(a: &NormalizedEntity, b: &NormalizedEntity) -> Ordering {
    a.kind
        .display_rank()
        .cmp(&b.kind.display_rank())
        .then(a.range.start.cmp(&b.range.start))
        .then_with(|| a.id.cmp(&b.id))
}

pub struct OccupancyIndex<'a> {
    window: VisibleWindow,
    limits: OccupancyLimits,
    // In-view entries, already in display order.
    entries: Vec<&'a NormalizedEntity>,
}

impl<'a> OccupancyIndex<'a> {
    pub fn new(
        window: VisibleWindow,
        entities: &'a [NormalizedEntity],
        limits: OccupancyLimits,
    ) -> Self {
        let mut entries: Vec<&NormalizedEntity> = entities
            .iter()
            .filter(|e| window.shows(&e.range))
            .collect();
        entries.sort_by(|a, b| display_order(a, b));
        Self {
            window,
            limits,
            entries,
        }
    }

    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    pub fn in_view(&self) -> &[&'a NormalizedEntity] {
        &self.entries
    }

    /// Every occupant of the cell, uncapped. A day-granularity window has
    /// no hour rows, so hour queries against it come back empty.
    pub fn all_occupants_for(&self, day: NaiveDate, hour: Option<u32>) -> Vec<&'a NormalizedEntity> {
        if !self.window.contains_day(day) {
            return Vec::new();
        }
        if let Some(h) = hour
            && (h >= 24 || self.window.granularity == Granularity::Day)
        {
            log::trace!("no hour row {} on {} for a {:?} window", h, day, self.window.granularity);
            return Vec::new();
        }
        self.entries
            .iter()
            .copied()
            .filter(|e| self.occupies(e, day, hour))
            .collect()
    }

    /// Occupants of the cell, capped by the per-day or per-hour limit.
    pub fn occupants_for(&self, day: NaiveDate, hour: Option<u32>) -> SlotOccupancy<'a> {
        let cap = match hour {
            Some(_) => self.limits.per_hour_cap,
            None => self.limits.per_day_cap,
        };
        let mut shown = self.all_occupants_for(day, hour);
        let overflow = shown.len().saturating_sub(cap);
        shown.truncate(cap);
        SlotOccupancy { shown, overflow }
    }

    /// Day in the window with the most occupants; the earliest wins a tie.
    pub fn busiest_day(&self) -> Option<(NaiveDate, usize)> {
        self.window
            .days()
            .map(|d| (d, self.all_occupants_for(d, None).len()))
            .filter(|(_, n)| *n > 0)
            .fold(None, |best: Option<(NaiveDate, usize)>, cur| match best {
                Some(b) if b.1 >= cur.1 => Some(b),
                _ => Some(cur),
            })
    }

    fn occupies(&self, entity: &NormalizedEntity, day: NaiveDate, hour: Option<u32>) -> bool {
        if !entity.range.contains_day(day) {
            return false;
        }
        let Some(hour) = hour else {
            return true;
        };
        match self.limits.indicator_hours.for_kind(entity.kind) {
            Some(indicator) => indicator == hour,
            None => match (entity.timing, NaiveTime::from_hms_opt(hour, 0, 0)) {
                (Some(t), Some(time)) => {
                    let slot_start = day.and_time(time);
                    let slot_end = slot_start + Duration::hours(1);
                    if t.start == t.end {
                        t.start >= slot_start && t.start < slot_end
                    } else {
                        t.start < slot_end && t.end > slot_start
                    }
                }
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventTiming;
    use crate::range::DateRange;
    use chrono::NaiveDateTime;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn entry(id: &str, kind: EntityKind, start: &str, end: &str) -> NormalizedEntity {
        NormalizedEntity {
            id: id.into(),
            kind,
            title: id.to_uppercase(),
            range: DateRange::new(d(start), d(end)).unwrap(),
            timing: None,
            priority: None,
            completed: false,
        }
    }

    fn event(id: &str, start: &str, end: &str) -> NormalizedEntity {
        let timing = EventTiming {
            start: dt(start),
            end: dt(end),
        };
        NormalizedEntity {
            id: id.into(),
            kind: EntityKind::Event,
            title: id.to_uppercase(),
            range: timing.day_range(),
            timing: Some(timing),
            priority: None,
            completed: false,
        }
    }

    fn june_week() -> VisibleWindow {
        VisibleWindow::new(d("2024-06-03"), d("2024-06-09"), Granularity::Day).unwrap()
    }

    fn june_week_hours() -> VisibleWindow {
        VisibleWindow::new(d("2024-06-03"), d("2024-06-09"), Granularity::Hour).unwrap()
    }

    #[test]
    fn order_is_independent_of_input_order() {
        let mut items = vec![
            entry("p", EntityKind::Project, "2024-06-01", "2024-06-30"),
            entry("s2", EntityKind::Sprint, "2024-06-04", "2024-06-06"),
            entry("s1", EntityKind::Sprint, "2024-06-03", "2024-06-07"),
            entry("t", EntityKind::Task, "2024-06-05", "2024-06-05"),
            event("e", "2024-06-05 10:00", "2024-06-05 11:00"),
        ];
        let limits = OccupancyLimits {
            per_day_cap: 10,
            ..Default::default()
        };
        let expected = vec!["e", "t", "s1", "s2", "p"];

        let ids = |items: &[NormalizedEntity]| -> Vec<String> {
            let index = OccupancyIndex::new(june_week(), items, limits);
            index
                .all_occupants_for(d("2024-06-05"), None)
                .iter()
                .map(|e| e.id.clone())
                .collect()
        };
        assert_eq!(ids(&items), expected);
        items.reverse();
        assert_eq!(ids(&items), expected);
    }

    #[test]
    fn cap_reports_overflow_without_losing_data() {
        let items: Vec<_> = (0..5)
            .map(|i| entry(&format!("t{i}"), EntityKind::Task, "2024-06-05", "2024-06-05"))
            .collect();
        let index = OccupancyIndex::new(june_week(), &items, OccupancyLimits::default());
        let slot = index.occupants_for(d("2024-06-05"), None);
        assert_eq!(slot.shown.len(), 3);
        assert_eq!(slot.overflow, 2);
        assert_eq!(index.all_occupants_for(d("2024-06-05"), None).len(), 5);
    }

    #[test]
    fn out_of_window_items_are_excluded() {
        let items = vec![entry("late", EntityKind::Task, "2024-06-20", "2024-06-20")];
        let index = OccupancyIndex::new(june_week(), &items, OccupancyLimits::default());
        assert!(index.in_view().is_empty());
        assert!(index.occupants_for(d("2024-06-20"), None).is_empty());
    }

    #[test]
    fn hour_grid_uses_indicator_rows_for_spans() {
        let items = vec![
            entry("s", EntityKind::Sprint, "2024-06-03", "2024-06-07"),
            entry("p", EntityKind::Project, "2024-06-05", "2024-06-05"),
            entry("t", EntityKind::Task, "2024-06-05", "2024-06-05"),
            event("e", "2024-06-05 14:30", "2024-06-05 16:00"),
        ];
        let index = OccupancyIndex::new(june_week_hours(), &items, OccupancyLimits::default());
        let at = |h| -> Vec<String> {
            index
                .all_occupants_for(d("2024-06-05"), Some(h))
                .iter()
                .map(|e| e.id.clone())
                .collect()
        };
        assert_eq!(at(1), vec!["s"]);
        assert_eq!(at(8), vec!["p"]);
        assert_eq!(at(9), vec!["t"]);
        assert_eq!(at(14), vec!["e"]);
        assert_eq!(at(15), vec!["e"]);
        assert!(at(16).is_empty());
        assert!(at(12).is_empty());
    }

    #[test]
    fn instant_event_sits_in_its_own_hour() {
        let items = vec![event("ping", "2024-06-04 09:15", "2024-06-04 09:15")];
        let index = OccupancyIndex::new(june_week_hours(), &items, OccupancyLimits::default());
        assert_eq!(index.all_occupants_for(d("2024-06-04"), Some(9)).len(), 1);
        assert!(index.all_occupants_for(d("2024-06-04"), Some(10)).is_empty());
    }

    #[test]
    fn day_window_has_no_hour_rows() {
        let items = vec![
            entry("t", EntityKind::Task, "2024-06-05", "2024-06-05"),
            event("e", "2024-06-05 14:00", "2024-06-05 15:00"),
        ];
        let days = OccupancyIndex::new(june_week(), &items, OccupancyLimits::default());
        assert!(days.occupants_for(d("2024-06-05"), Some(9)).is_empty());
        assert!(days.all_occupants_for(d("2024-06-05"), Some(14)).is_empty());
        assert_eq!(days.occupants_for(d("2024-06-05"), None).total(), 2);

        let hours = OccupancyIndex::new(june_week_hours(), &items, OccupancyLimits::default());
        assert_eq!(hours.all_occupants_for(d("2024-06-05"), Some(9)).len(), 1);
        assert_eq!(hours.occupants_for(d("2024-06-05"), None).total(), 2);
    }

    #[test]
    fn busiest_day_prefers_earliest_on_tie() {
        let items = vec![
            entry("a", EntityKind::Task, "2024-06-04", "2024-06-04"),
            entry("b", EntityKind::Task, "2024-06-06", "2024-06-06"),
        ];
        let index = OccupancyIndex::new(june_week(), &items, OccupancyLimits::default());
        assert_eq!(index.busiest_day(), Some((d("2024-06-04"), 1)));
    }
}
