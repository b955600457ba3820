use crate::model::EntityKind;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range starts on {start} but ends on {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
    #[error("`{0}` has neither a start nor an end date")]
    Unanchored(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    /// Another gesture is still in flight; the caller decides whether to cancel it.
    #[error("a drag session for `{0}` is already active")]
    SessionActive(String),
    #[error("{0} items cannot be resized")]
    ResizeNotAllowed(EntityKind),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("palette_size must be greater than zero")]
    EmptyPalette,
    #[error("indicator hour {0} is outside 0..24")]
    IndicatorHour(u32),
    #[error("occupancy.{0} must be greater than zero")]
    ZeroCap(&'static str),
}
