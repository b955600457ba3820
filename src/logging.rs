//! Logger bootstrap for the `planboard` binary.
//!
//! The library only talks to the `log` facade; hosts embedding it bring
//! their own backend. This module wires `flexi_logger` to stderr once.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

pub const LOG_LEVEL_ENV: &str = "PLANBOARD_LOG";
const DEFAULT_LEVEL: &str = "warn";
const SUPPORTED_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Level from `PLANBOARD_LOG`, falling back to `warn` for unknown values.
pub fn level_from_env() -> String {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|v| normalize_level(&v))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

fn normalize_level(level: &str) -> Option<String> {
    let level = level.trim().to_ascii_lowercase();
    SUPPORTED_LEVELS.contains(&level.as_str()).then_some(level)
}

/// Starts stderr logging. Repeated calls are no-ops.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level).ok_or_else(|| format!("unsupported log level `{level}`"))?;
    LOGGER
        .get_or_try_init(|| {
            Logger::try_with_str(&level)
                .and_then(|logger| logger.log_to_stderr().start())
                .map_err(|err| format!("failed to start logger: {err}"))
        })
        .map(|_| ())
}
