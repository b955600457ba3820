// File: ./src/model/adapter.rs
// Folds the four entity shapes into one canonical record, and back
use crate::drag::RangeUpdate;
use crate::error::RangeError;
use crate::model::entity::{EntityKind, Priority, ScheduleEntity, SprintStatus};
use crate::range::{DateRange, InvertedRangePolicy};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Wall-clock span of an event, kept for hour-grid placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTiming {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventTiming {
    pub fn shift_days(&self, n: i64) -> Self {
        let delta = chrono::Duration::days(n);
        Self {
            start: self.start.checked_add_signed(delta).unwrap_or(self.start),
            end: self.end.checked_add_signed(delta).unwrap_or(self.end),
        }
    }

    /// Days touched by this span. An end at exactly midnight does not
    /// spill into the following day.
    pub fn day_range(&self) -> DateRange {
        let mut end = self.end.date();
        if self.end > self.start && self.end.time() == NaiveTime::MIN {
            end = end.pred_opt().unwrap_or(end);
        }
        DateRange {
            start: self.start.date(),
            end: end.max(self.start.date()),
        }
    }
}

/// The canonical shape every grid computation works on.
/// Always satisfies `range.start <= range.end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntity {
    pub id: String,
    pub kind: EntityKind,
    pub title: String,
    pub range: DateRange,
    pub timing: Option<EventTiming>,
    /// Only tasks carry a priority.
    pub priority: Option<Priority>,
    /// Task `completed`, or sprint status `Completed`.
    pub completed: bool,
}

impl ScheduleEntity {
    pub fn normalize(&self, policy: InvertedRangePolicy) -> Result<NormalizedEntity, RangeError> {
        let (range, timing, priority, completed) = match self {
            ScheduleEntity::Event(e) => {
                let timing = if e.start <= e.end {
                    EventTiming {
                        start: e.start,
                        end: e.end,
                    }
                } else {
                    match policy {
                        InvertedRangePolicy::Collapse => EventTiming {
                            start: e.start,
                            end: e.start,
                        },
                        InvertedRangePolicy::Swap => EventTiming {
                            start: e.end,
                            end: e.start,
                        },
                        InvertedRangePolicy::Reject => {
                            return Err(RangeError::Inverted {
                                start: e.start.date(),
                                end: e.end.date(),
                            });
                        }
                    }
                };
                (timing.day_range(), Some(timing), None, false)
            }
            ScheduleEntity::Sprint(s) => (
                DateRange::from_bounds(s.start, s.end, policy)?,
                None,
                None,
                s.status == SprintStatus::Completed,
            ),
            ScheduleEntity::Task(t) => {
                // Collapsing lands on the end bound, which for a task is `due`.
                let range = DateRange::from_bounds(t.start.unwrap_or(t.due), t.due, policy)?;
                (range, None, Some(t.priority), t.completed)
            }
            ScheduleEntity::Project(p) => {
                let range = match (p.start, p.end) {
                    (Some(start), Some(end)) => DateRange::from_bounds(start, end, policy)?,
                    (Some(day), None) | (None, Some(day)) => DateRange::single(day),
                    (None, None) => return Err(RangeError::Unanchored(p.id.clone())),
                };
                (range, None, None, false)
            }
        };

        Ok(NormalizedEntity {
            id: self.id().to_string(),
            kind: self.kind(),
            title: self.title().to_string(),
            range,
            timing,
            priority,
            completed,
        })
    }

    /// Writes a committed range back into this entity's own field layout.
    /// Returns false when the update targets a different entity.
    pub fn apply_update(&mut self, update: &RangeUpdate) -> bool {
        if self.id() != update.entity_id || self.kind() != update.kind {
            return false;
        }
        let (start, end) = (update.new_start, update.new_end);
        match self {
            ScheduleEntity::Event(e) => {
                if let Some(timing) = update.new_timing {
                    e.start = timing.start;
                    e.end = timing.end;
                } else {
                    e.start = start.and_time(e.start.time());
                    e.end = end.and_time(e.end.time());
                }
            }
            ScheduleEntity::Sprint(s) => {
                s.start = start;
                s.end = end;
            }
            ScheduleEntity::Task(t) => {
                t.due = end;
                t.start = if start == end { None } else { Some(start) };
            }
            ScheduleEntity::Project(p) => match (p.start, p.end) {
                (Some(_), None) if start == end => p.start = Some(start),
                (None, Some(_)) if start == end => p.end = Some(end),
                _ => {
                    p.start = Some(start);
                    p.end = Some(end);
                }
            },
        }
        true
    }
}

/// Normalizes a batch, dropping entries the policy refuses to place.
pub fn normalize_all(
    entities: &[ScheduleEntity],
    policy: InvertedRangePolicy,
) -> Vec<NormalizedEntity> {
    entities
        .iter()
        .filter_map(|e| match e.normalize(policy) {
            Ok(n) => Some(n),
            Err(err) => {
                log::warn!("skipping {} `{}`: {}", e.kind(), e.id(), err);
                None
            }
        })
        .collect()
}
