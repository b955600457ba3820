// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod adapter;
pub mod entity;

pub use adapter::{EventTiming, NormalizedEntity, normalize_all};
pub use entity::{EntityKind, Event, Priority, Project, ScheduleEntity, Sprint, SprintStatus, Task};
