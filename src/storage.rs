use crate::model::ScheduleEntity;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use fs2::FileExt;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "PLANBOARD_DATA_DIR";

/// Where the CLI keeps its entity snapshot and journal.
pub fn data_dir() -> Option<PathBuf> {
    // ISOLATION: Check env var first
    let dir = if let Ok(dir) = env::var(DATA_DIR_ENV) {
        PathBuf::from(dir)
    } else {
        ProjectDirs::from("com", "planboard", "planboard")?
            .data_dir()
            .to_path_buf()
    };
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

pub struct LocalStorage;

impl LocalStorage {
    pub fn default_path() -> Option<PathBuf> {
        data_dir().map(|d| d.join("entities.json"))
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Runs `f` while holding an exclusive advisory lock on `<path>.lock`.
    pub fn with_lock<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("opening lock {}", lock_path.display()))?;
        lock_file.lock_exclusive()?;
        let result = f();
        let _ = FileExt::unlock(&lock_file);
        result
    }

    pub fn save(path: &Path, entities: &[ScheduleEntity]) -> Result<()> {
        Self::with_lock(path, || {
            let json = serde_json::to_string_pretty(entities)?;
            Self::atomic_write(path, json)
        })
    }

    /// A missing file is an empty collection; a corrupt one is an error so
    /// the caller never overwrites data it could not read.
    pub fn load(path: &Path) -> Result<Vec<ScheduleEntity>> {
        if !path.exists() {
            return Ok(vec![]);
        }
        Self::with_lock(path, || Self::load_internal(path))
    }

    fn load_internal(path: &Path) -> Result<Vec<ScheduleEntity>> {
        if !path.exists() {
            return Ok(vec![]);
        }
        let json = fs::read_to_string(path)?;
        let entities =
            serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
        Ok(entities)
    }

    /// Transactional edit of the entity file.
    /// Locks -> Loads -> Applies Closure -> Saves if changed -> Unlocks.
    /// An error from the closure leaves the file as it was.
    pub fn modify<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<ScheduleEntity>) -> Result<T>,
    {
        Self::with_lock(path, || {
            let before = Self::load_internal(path)?;
            let mut entities = before.clone();
            let result = f(&mut entities)?;
            if entities != before {
                let json = serde_json::to_string_pretty(&entities)?;
                Self::atomic_write(path, json)?;
            }
            Ok(result)
        })
    }
}
