//! Persistence backends for the result cache.

use super::CacheEntry;
use crate::error::CacheError;
use log::trace;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Whole-entry persistence addressed by repository identity.
///
/// Implementations report failures as [`CacheError`]; the cache turns them
/// into warnings.
pub trait CacheStore {
    /// Loads the entry for `identity`, or `None` if there is none.
    fn load(&self, identity: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Writes `entry`, replacing any previous entry for its identity.
    fn store(&self, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Deletes the entry for `identity`. Deleting a missing entry succeeds.
    fn delete(&self, identity: &str) -> Result<(), CacheError>;
}

/// Stores each entry as a JSON file named after the repository identity.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    /// Creates a store that keeps its files in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store under the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("codeowners-query"))
    }

    /// The directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `identity`.
    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.dir.join(format!("{}.json", identity))
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self, identity: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.path_for(identity);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        trace!("Loaded cache file {}", path.display());
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&entry.repository_identity);
        fs::write(&path, serde_json::to_vec(entry)?)?;
        trace!("Wrote cache file {}", path.display());
        Ok(())
    }

    fn delete(&self, identity: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(identity)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(dir.path());
        assert!(store.load("abc").unwrap().is_none());
    }

    #[test]
    fn store_creates_directory_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(dir.path().join("nested/cache"));

        let mut entry = CacheEntry::new("abc", "rules", 42);
        entry.entries.insert(".:true".to_string(), Default::default());
        store.store(&entry).unwrap();

        assert!(store.path_for("abc").is_file());
        assert_eq!(store.load("abc").unwrap(), Some(entry));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(dir.path());
        fs::write(store.path_for("abc"), "not json").unwrap();
        assert!(matches!(
            store.load("abc"),
            Err(CacheError::Serialization(_))
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(dir.path());
        store.store(&CacheEntry::new("abc", "rules", 1)).unwrap();
        store.delete("abc").unwrap();
        store.delete("abc").unwrap();
        assert!(store.load("abc").unwrap().is_none());
    }

    #[test]
    fn store_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        // A regular file where the cache directory should be.
        let store = FileCacheStore::new(&blocker);
        assert!(matches!(
            store.store(&CacheEntry::new("abc", "rules", 1)),
            Err(CacheError::Io(_))
        ));
    }
}
