//! Persisted tutorial progress
//!
//! A single key holds the index of the last active step as decimal text.
//! Absence of the key means there is nothing to resume.

use crate::TutorialError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Key under which the step index is stored
pub const PROGRESS_KEY: &str = "deepfabric-tutorial-progress";

pub trait ProgressStore: Send {
    /// Read the stored index, `None` when absent
    fn load(&self) -> Result<Option<usize>, TutorialError>;

    fn save(&mut self, index: usize) -> Result<(), TutorialError>;

    /// Delete the stored index; deleting an absent key succeeds
    fn clear(&mut self) -> Result<(), TutorialError>;
}

/// Stores the index in `<dir>/deepfabric-tutorial-progress`
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PROGRESS_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> Result<Option<usize>, TutorialError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match raw.trim().parse::<usize>() {
            Ok(index) => Ok(Some(index)),
            Err(_) => {
                debug!(path = %self.path.display(), "Ignoring unparsable progress value");
                Ok(None)
            }
        }
    }

    fn save(&mut self, index: usize) -> Result<(), TutorialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, index.to_string())?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), TutorialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    slot: Arc<Mutex<Option<usize>>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(index: usize) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(index))),
        }
    }

    /// Current value, for inspection
    pub fn get(&self) -> Option<usize> {
        self.slot.lock().map(|slot| *slot).unwrap_or(None)
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut Option<usize>) -> T) -> Result<T, TutorialError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| TutorialError::StorageUnavailable("progress slot poisoned".into()))?;
        Ok(f(&mut *slot))
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<Option<usize>, TutorialError> {
        self.with_slot(|slot| *slot)
    }

    fn save(&mut self, index: usize) -> Result<(), TutorialError> {
        self.with_slot(|slot| *slot = Some(index))
    }

    fn clear(&mut self) -> Result<(), TutorialError> {
        self.with_slot(|slot| *slot = None)
    }
}

/// Store used when no data directory can be determined; every call fails
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ProgressStore for UnavailableStore {
    fn load(&self) -> Result<Option<usize>, TutorialError> {
        Err(TutorialError::StorageUnavailable(self.reason.clone()))
    }

    fn save(&mut self, _index: usize) -> Result<(), TutorialError> {
        Err(TutorialError::StorageUnavailable(self.reason.clone()))
    }

    fn clear(&mut self) -> Result<(), TutorialError> {
        Err(TutorialError::StorageUnavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clones_share_slot() {
        let store = MemoryProgressStore::new();
        let mut writer = store.clone();
        writer.save(3).unwrap();
        assert_eq!(store.get(), Some(3));
        writer.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_unavailable_always_errors() {
        let mut store = UnavailableStore::new("no data dir");
        assert!(store.load().is_err());
        assert!(store.save(1).is_err());
        assert!(store.clear().is_err());
    }
}
