//! File-based storage for the log archive index.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::archive::LogIndex;
use crate::repository::{RepositoryError, Result};

/// JSON file holding the whole [`LogIndex`].
///
/// The file is always rewritten in full: serialized to `{name}.tmp`, then
/// renamed over the previous index.
pub struct FileLogIndexRepository {
    path: PathBuf,
}

impl FileLogIndexRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index; a missing file yields an empty, never-scanned index.
    pub fn load(&self) -> Result<LogIndex> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LogIndex::default()),
            Err(e) => return Err(RepositoryError::Io(e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))
    }

    pub fn save(&self, index: &LogIndex) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        let temp_path = self.path.with_extension("tmp");

        let json =
            serde_json::to_vec_pretty(index).map_err(|e| RepositoryError::Json(e.to_string()))?;
        fs::write(&temp_path, json).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            target: "runtime::archive",
            entries = index.logs.len(),
            "Saved log index to {}",
            self.path.display()
        );

        Ok(())
    }
}
