// File: ./src/drag.rs
// Move/resize gesture on the grid, from pointer-down to commit
use crate::error::DragError;
use crate::model::{EntityKind, EventTiming, NormalizedEntity};
use crate::range::{DateRange, shift_date};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

impl std::str::FromStr for DragMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "move" => Ok(DragMode::Move),
            "start" | "resize_start" => Ok(DragMode::ResizeStart),
            "end" | "resize_end" => Ok(DragMode::ResizeEnd),
            other => Err(format!("Unknown drag mode: {}", other)),
        }
    }
}

/// Grid position under the pointer, already translated from pixels by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pointer(pub NaiveDateTime);

impl From<NaiveDateTime> for Pointer {
    fn from(value: NaiveDateTime) -> Self {
        Pointer(value)
    }
}

impl From<NaiveDate> for Pointer {
    fn from(value: NaiveDate) -> Self {
        Pointer(value.and_time(NaiveTime::MIN))
    }
}

/// Whole days between two pointer positions, truncated toward zero.
/// Less than a full day of travel does not register.
pub fn day_delta(anchor: Pointer, pointer: Pointer) -> i64 {
    (pointer.0 - anchor.0).num_milliseconds() / MS_PER_DAY
}

/// Which kinds may have an edge dragged. Moving is always allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragRules {
    pub resizable: Vec<EntityKind>,
}

impl Default for DragRules {
    fn default() -> Self {
        Self {
            resizable: EntityKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub entity_id: String,
    pub kind: EntityKind,
    pub mode: DragMode,
    pub anchor: Pointer,
    pub original_range: DateRange,
    pub current_range: DateRange,
    original_timing: Option<EventTiming>,
    current_timing: Option<EventTiming>,
}

impl DragSession {
    pub fn current_timing(&self) -> Option<EventTiming> {
        self.current_timing
    }

    fn is_unchanged(&self) -> bool {
        self.current_range == self.original_range && self.current_timing == self.original_timing
    }
}

/// In-flight range to draw while the pointer is still down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPreview {
    pub range: DateRange,
    pub timing: Option<EventTiming>,
    /// False when this pointer position was refused and the last valid range kept.
    pub accepted: bool,
}

/// What the host sends to the backend's update-by-id call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeUpdate {
    pub entity_id: String,
    pub kind: EntityKind,
    pub new_start: NaiveDate,
    pub new_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_timing: Option<EventTiming>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Updated(RangeUpdate),
    /// Net movement was zero; nothing to persist.
    Unchanged,
    /// No session was active.
    Idle,
}

/// Owns the one gesture that may be in progress.
#[derive(Debug, Default)]
pub struct DragController {
    rules: DragRules,
    session: Option<DragSession>,
}

impl DragController {
    pub fn new(rules: DragRules) -> Self {
        Self {
            rules,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Starts a gesture. Fails without touching the active session if one exists.
    pub fn begin(
        &mut self,
        entity: &NormalizedEntity,
        mode: DragMode,
        pointer: impl Into<Pointer>,
    ) -> Result<&DragSession, DragError> {
        if let Some(active) = &self.session {
            return Err(DragError::SessionActive(active.entity_id.clone()));
        }
        if mode != DragMode::Move && !self.rules.resizable.contains(&entity.kind) {
            return Err(DragError::ResizeNotAllowed(entity.kind));
        }
        log::debug!("drag {:?} begins on {} `{}`", mode, entity.kind, entity.id);
        Ok(&*self.session.insert(DragSession {
            entity_id: entity.id.clone(),
            kind: entity.kind,
            mode,
            anchor: pointer.into(),
            original_range: entity.range,
            current_range: entity.range,
            original_timing: entity.timing,
            current_timing: entity.timing,
        }))
    }

    /// Recomputes the range from the pointer's day offset to the anchor.
    /// Returns `None` when idle.
    pub fn update(&mut self, pointer: impl Into<Pointer>) -> Option<DragPreview> {
        let session = self.session.as_mut()?;
        let delta = day_delta(session.anchor, pointer.into());
        let original = session.original_range;
        let timing = session.original_timing;

        let candidate = match session.mode {
            DragMode::Move => Some((original.shift_days(delta), timing.map(|t| t.shift_days(delta)))),
            DragMode::ResizeStart => {
                let start = shift_date(original.start, delta);
                (start < original.end).then(|| {
                    let range = DateRange {
                        start,
                        end: original.end,
                    };
                    let timing = timing.map(|t| EventTiming {
                        start: t.shift_days(delta).start,
                        end: t.end,
                    });
                    (range, timing)
                })
            }
            DragMode::ResizeEnd => {
                let end = shift_date(original.end, delta);
                (end > original.start).then(|| {
                    let range = DateRange {
                        start: original.start,
                        end,
                    };
                    let timing = timing.map(|t| EventTiming {
                        start: t.start,
                        end: t.shift_days(delta).end,
                    });
                    (range, timing)
                })
            }
        };

        let accepted = candidate.is_some();
        match candidate {
            Some((range, timing)) => {
                session.current_range = range;
                session.current_timing = timing;
            }
            None => log::debug!(
                "rejected {:?} delta {} for `{}`: edge would cross {}",
                session.mode,
                delta,
                session.entity_id,
                original
            ),
        }

        Some(DragPreview {
            range: session.current_range,
            timing: session.current_timing,
            accepted,
        })
    }

    /// Ends the gesture and hands back the range to persist, if it moved.
    pub fn commit(&mut self) -> CommitOutcome {
        let Some(session) = self.session.take() else {
            return CommitOutcome::Idle;
        };
        if session.is_unchanged() {
            log::debug!("drag on `{}` ended where it began", session.entity_id);
            return CommitOutcome::Unchanged;
        }
        log::info!(
            "{} `{}` moved {} -> {}",
            session.kind,
            session.entity_id,
            session.original_range,
            session.current_range
        );
        CommitOutcome::Updated(RangeUpdate {
            entity_id: session.entity_id,
            kind: session.kind,
            new_start: session.current_range.start,
            new_end: session.current_range.end,
            new_timing: session.current_timing,
        })
    }

    /// Drops the gesture. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                log::debug!("drag on `{}` cancelled", session.entity_id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sprint() -> NormalizedEntity {
        NormalizedEntity {
            id: "s1".into(),
            kind: EntityKind::Sprint,
            title: "Sprint 1".into(),
            range: DateRange::new(d("2024-06-03"), d("2024-06-07")).unwrap(),
            timing: None,
            priority: None,
            completed: false,
        }
    }

    #[test]
    fn partial_day_travel_does_not_register() {
        let anchor = Pointer::from(d("2024-06-03"));
        let almost = Pointer(d("2024-06-04").and_hms_opt(23, 59, 0).unwrap());
        assert_eq!(day_delta(anchor, almost), 1);
        let back = Pointer(d("2024-06-02").and_hms_opt(1, 0, 0).unwrap());
        assert_eq!(day_delta(anchor, back), 0);
    }

    #[test]
    fn second_begin_is_refused() {
        let mut drag = DragController::default();
        drag.begin(&sprint(), DragMode::Move, d("2024-06-03")).unwrap();
        let err = drag.begin(&sprint(), DragMode::Move, d("2024-06-04")).unwrap_err();
        assert_eq!(err, DragError::SessionActive("s1".into()));
        assert_eq!(drag.session().unwrap().anchor, Pointer::from(d("2024-06-03")));
    }

    #[test]
    fn resize_can_be_disabled_per_kind() {
        let mut drag = DragController::new(DragRules {
            resizable: vec![EntityKind::Event],
        });
        assert_eq!(
            drag.begin(&sprint(), DragMode::ResizeEnd, d("2024-06-07")).unwrap_err(),
            DragError::ResizeNotAllowed(EntityKind::Sprint)
        );
        assert!(!drag.is_active());
        assert!(drag.begin(&sprint(), DragMode::Move, d("2024-06-05")).is_ok());
    }

    #[test]
    fn rejected_update_keeps_last_valid_range() {
        let mut drag = DragController::default();
        drag.begin(&sprint(), DragMode::ResizeEnd, d("2024-06-07")).unwrap();
        let ok = drag.update(d("2024-06-05")).unwrap();
        assert!(ok.accepted);
        assert_eq!(ok.range.end, d("2024-06-05"));

        let bad = drag.update(d("2024-06-03")).unwrap();
        assert!(!bad.accepted);
        assert_eq!(bad.range.end, d("2024-06-05"));
    }

    #[test]
    fn cancel_discards_and_frees_the_slot() {
        let mut drag = DragController::default();
        drag.begin(&sprint(), DragMode::Move, d("2024-06-03")).unwrap();
        drag.update(d("2024-06-05"));
        assert!(drag.cancel());
        assert!(!drag.cancel());
        assert_eq!(drag.commit(), CommitOutcome::Idle);
        assert!(drag.update(d("2024-06-06")).is_none());
    }
}
