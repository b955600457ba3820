// File: ./src/journal.rs
// Outbox of committed range changes waiting for the backend
use crate::drag::RangeUpdate;
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The persistence collaborator: receives each committed change.
/// Retries, auth and response handling live behind this seam.
pub trait UpdateSink {
    fn submit(&mut self, update: RangeUpdate) -> Result<()>;
}

/// In-process sink, handy for hosts that batch their own writes.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub updates: Vec<RangeUpdate>,
}

impl UpdateSink for MemorySink {
    fn submit(&mut self, update: RangeUpdate) -> Result<()> {
        self.updates.push(update);
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Journal {
    pub queue: Vec<RangeUpdate>,
}

impl Journal {
    pub fn default_path() -> Option<PathBuf> {
        crate::storage::data_dir().map(|d| d.join("journal.json"))
    }

    /// Internal load helper (no locking). A missing journal is empty; an
    /// unreadable one is an error so queued updates are never written over.
    fn load_internal(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let journal = serde_json::from_str(&content)
            .with_context(|| format!("parsing journal {}", path.display()))?;
        Ok(journal)
    }

    /// Public load with locking. Read-only, so a broken journal is shown as
    /// empty and left on disk untouched.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match LocalStorage::with_lock(path, || Self::load_internal(path)) {
            Ok(journal) => journal,
            Err(e) => {
                log::warn!("ignoring unreadable journal: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queues an update. A pending update for the same entity is replaced,
    /// since only the latest range needs to reach the backend.
    pub fn push(path: &Path, update: RangeUpdate) -> Result<()> {
        Self::modify(path, |queue| {
            queue.retain(|u| !(u.entity_id == update.entity_id && u.kind == update.kind));
            queue.push(update);
        })
    }

    /// Hands every queued update to `sink` in order. Updates the sink
    /// refuses stay queued, together with everything after them.
    pub fn drain<S: UpdateSink>(path: &Path, sink: &mut S) -> Result<usize> {
        let mut sent = 0;
        let mut failure = None;
        Self::modify(path, |queue| {
            let pending = std::mem::take(queue);
            let mut rest = pending.into_iter();
            for update in rest.by_ref() {
                if let Err(e) = sink.submit(update.clone()) {
                    log::warn!("journal drain stopped at `{}`: {}", update.entity_id, e);
                    queue.push(update);
                    failure = Some(e);
                    break;
                }
                sent += 1;
            }
            queue.extend(rest);
        })?;
        match failure {
            Some(e) => Err(e),
            None => Ok(sent),
        }
    }

    /// Transactional modification of the journal queue.
    /// Locks -> Loads -> Applies Closure -> Saves -> Unlocks.
    pub fn modify<F>(path: &Path, f: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<RangeUpdate>),
    {
        LocalStorage::with_lock(path, || {
            let mut journal = Self::load_internal(path)?;
            f(&mut journal.queue);
            let json = serde_json::to_string_pretty(&journal)?;
            LocalStorage::atomic_write(path, json)?;
            Ok(())
        })
    }
}

/// The journal itself can stand in as the collaborator: commits are
/// queued on disk until something drains them.
pub struct JournalSink {
    path: PathBuf,
}

impl JournalSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UpdateSink for JournalSink {
    fn submit(&mut self, update: RangeUpdate) -> Result<()> {
        Journal::push(&self.path, update)
    }
}
