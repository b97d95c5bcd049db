//! File-based BlobRepository implementation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::repository::{BlobRepository, RepositoryError, Result};

/// File-based implementation of BlobRepository.
///
/// Each key maps to one file under `base_dir`. Writes go to `{key}.tmp` first
/// and are renamed over the target, so a crash mid-write leaves the previous
/// blob intact.
pub struct FileBlobRepository {
    base_dir: PathBuf,
}

impl FileBlobRepository {
    /// Create a new file-based blob repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    /// Get the path to a blob file.
    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(key))
    }
}

impl BlobRepository for FileBlobRepository {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.blob_path(key)?;
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved blob[{}] ({} bytes) to {}", key, bytes.len(), path.display());

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(key)?;

        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.blob_path(key).is_ok_and(|path| path.exists())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Deleted blob[{}]", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn put_get_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileBlobRepository::new(temp_dir.path()).unwrap();

        assert_eq!(repo.get("current_game").unwrap(), None);
        repo.put("current_game", b"first").unwrap();
        repo.put("current_game", b"second").unwrap();
        assert_eq!(repo.get("current_game").unwrap(), Some(b"second".to_vec()));
        assert!(repo.exists("current_game"));
        assert!(!temp_dir.path().join("current_game.tmp").exists());

        repo.delete("current_game").unwrap();
        repo.delete("current_game").unwrap();
        assert!(!repo.exists("current_game"));
    }

    #[test]
    fn rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileBlobRepository::new(temp_dir.path()).unwrap();

        assert!(matches!(
            repo.put("../escape", b"x"),
            Err(RepositoryError::InvalidKey(_))
        ));
        assert!(!repo.exists(""));
    }
}
