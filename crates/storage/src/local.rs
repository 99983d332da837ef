//! Device-scoped resume persistence.
//!
//! One JSON file per user under a data directory, named after the
//! legacy key scheme (`inProgressTest_<uid>`). A missing or unreadable
//! file degrades to "no snapshot" so a resume silently falls back to a
//! fresh start.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::model::{ResumeSnapshot, UserId};
use tracing::warn;

use crate::repository::{ResumeStore, StorageError};

/// JSON-file-backed [`ResumeStore`].
#[derive(Clone, Debug)]
pub struct LocalResumeStore {
    dir: PathBuf,
}

impl LocalResumeStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, user_id: UserId) -> PathBuf {
        self.dir.join(format!("inProgressTest_{user_id}.json"))
    }
}

fn io_err(path: &Path, e: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {e}", path.display()))
}

#[async_trait]
impl ResumeStore for LocalResumeStore {
    async fn save(&self, user_id: UserId, snapshot: &ResumeSnapshot) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, &e))?;
        let path = self.path_for(user_id);
        let json = serde_json::to_vec(snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        std::fs::write(&path, json).map_err(|e| io_err(&path, &e))
    }

    async fn load(&self, user_id: UserId) -> Result<Option<ResumeSnapshot>, StorageError> {
        let path = self.path_for(user_id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&path, &e)),
        };

        match serde_json::from_slice::<ResumeSnapshot>(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                // Unreadable snapshots are treated as absent, not fatal.
                warn!(path = %path.display(), error = %e, "discarding corrupt resume snapshot");
                Ok(None)
            }
        }
    }

    async fn clear(&self, user_id: UserId) -> Result<(), StorageError> {
        let path = self.path_for(user_id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path, &e)),
        }
    }
}
