// File: ./src/config.rs
use crate::drag::DragRules;
use crate::error::ConfigError;
use crate::occupancy::OccupancyLimits;
use crate::range::{InvertedRangePolicy, WeekStart};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_ENV: &str = "PLANBOARD_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub palette_size: usize,
    pub week_start: WeekStart,
    pub inverted_ranges: InvertedRangePolicy,
    pub occupancy: OccupancyLimits,
    pub drag: DragRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette_size: 8,
            week_start: WeekStart::Monday,
            inverted_ranges: InvertedRangePolicy::Collapse,
            occupancy: OccupancyLimits::default(),
            drag: DragRules::default(),
        }
    }
}

impl Config {
    pub fn get_path() -> Option<PathBuf> {
        // ISOLATION: Check env var first
        if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join("config.toml"));
        }
        ProjectDirs::from("com", "planboard", "planboard")
            .map(|proj| proj.config_dir().join("config.toml"))
    }

    /// Loads the user config. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::get_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::parse(&content)?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.palette_size == 0 {
            return Err(ConfigError::EmptyPalette);
        }
        if self.occupancy.per_day_cap == 0 {
            return Err(ConfigError::ZeroCap("per_day_cap"));
        }
        if self.occupancy.per_hour_cap == 0 {
            return Err(ConfigError::ZeroCap("per_hour_cap"));
        }
        let hours = self.occupancy.indicator_hours;
        for h in [hours.sprint, hours.project, hours.task] {
            if h >= 24 {
                return Err(ConfigError::IndicatorHour(h));
            }
        }
        Ok(())
    }

    pub fn palette(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.palette_size).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = Config::parse(
            r#"
            palette_size = 12
            week_start = "sunday"
            inverted_ranges = "reject"

            [occupancy]
            per_day_cap = 5

            [occupancy.indicator_hours]
            task = 10

            [drag]
            resizable = ["sprint", "project"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.palette_size, 12);
        assert_eq!(cfg.week_start, WeekStart::Sunday);
        assert_eq!(cfg.inverted_ranges, InvertedRangePolicy::Reject);
        assert_eq!(cfg.occupancy.per_day_cap, 5);
        assert_eq!(cfg.occupancy.per_hour_cap, 2);
        assert_eq!(cfg.occupancy.indicator_hours.task, 10);
        assert_eq!(cfg.occupancy.indicator_hours.sprint, 1);
        assert_eq!(cfg.drag.resizable, vec![EntityKind::Sprint, EntityKind::Project]);
    }

    #[test]
    fn rejects_unusable_values() {
        assert!(matches!(
            Config::parse("palette_size = 0"),
            Err(ConfigError::EmptyPalette)
        ));
        assert!(matches!(
            Config::parse("[occupancy.indicator_hours]\nsprint = 24"),
            Err(ConfigError::IndicatorHour(24))
        ));
        assert!(matches!(
            Config::parse("[occupancy]\nper_day_cap = 0"),
            Err(ConfigError::ZeroCap("per_day_cap"))
        ));
        assert!(matches!(
            Config::parse("[occupancy]\nper_hour_cap = 0"),
            Err(ConfigError::ZeroCap("per_hour_cap"))
        ));
        assert!(matches!(
            Config::parse("palette_size = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
