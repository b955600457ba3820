pub mod cli;
pub mod color_utils;
pub mod config;
pub mod drag;
pub mod error;
pub mod filter;
pub mod journal;
pub mod logging;
pub mod model;
pub mod occupancy;
pub mod range;
pub mod storage;

pub use color_utils::color_bucket;
pub use config::Config;
pub use drag::{CommitOutcome, DragController, DragMode, DragPreview, DragSession, RangeUpdate};
pub use error::{ConfigError, DragError, RangeError};
pub use filter::{DateFilter, DatePreset, FilterState};
pub use model::{EntityKind, NormalizedEntity, Priority, ScheduleEntity};
pub use occupancy::{OccupancyIndex, OccupancyLimits, SlotOccupancy};
pub use range::{DateRange, Granularity, VisibleWindow};
