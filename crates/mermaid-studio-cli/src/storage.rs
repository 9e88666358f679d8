//! File-backed session storage.
//!
//! The stored session is a flat TOML table of string slots kept in
//! `session.toml` inside the data directory. Every write rewrites the whole
//! file.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::debug;

use mermaid_studio::ports::{Storage, StorageError};

use crate::config::PROJECT;

/// Name of the session file inside the data directory.
const SESSION_FILE: &str = "session.toml";

/// [`Storage`] persisted to a TOML file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage kept in `dir`, which is created on first write.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    /// Storage in the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if no data directory can be determined.
    pub fn platform() -> Result<Self, StorageError> {
        let (qualifier, organization, application) = PROJECT;
        let dirs = ProjectDirs::from(qualifier, organization, application).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine the platform data directory",
            )
        })?;
        Ok(Self::in_dir(dirs.data_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = self.path.display().to_string(); "No stored session");
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        toml::from_str(&content).map_err(|err| StorageError::Format(err.to_string()))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        let content =
            toml::to_string(&values).map_err(|err| StorageError::Format(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;

        debug!(key, path = self.path.display().to_string(); "Stored session slot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());

        assert_eq!(storage.get("mermaid-go-code").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_slots_are_kept_side_by_side() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::in_dir(dir.path().join("nested"));

        storage.set("mermaid-go-code", "graph TD\n  A --> B").unwrap();
        storage.set("mermaid-go-title", "Flow").unwrap();
        storage.set("mermaid-go-title", "Flow v2").unwrap();

        let reopened = FileStorage::in_dir(dir.path().join("nested"));
        assert_eq!(
            reopened.get("mermaid-go-code").unwrap().as_deref(),
            Some("graph TD\n  A --> B")
        );
        assert_eq!(
            reopened.get("mermaid-go-title").unwrap().as_deref(),
            Some("Flow v2")
        );
    }

    #[test]
    fn test_corrupt_file_is_a_format_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "not = [valid").unwrap();

        let mut storage = FileStorage::in_dir(dir.path());
        assert!(matches!(
            storage.get("mermaid-go-code"),
            Err(StorageError::Format(_))
        ));
        assert!(matches!(
            storage.set("mermaid-go-code", "pie"),
            Err(StorageError::Format(_))
        ));
    }
}
