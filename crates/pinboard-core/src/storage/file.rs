//! Directory-backed store: one file per key.
//!
//! File names are the URL-encoded key plus a `.json` suffix, so any key
//! (including widget ids with spaces or slashes) maps to a flat, portable
//! file name. Writes land in a temp file first and are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::StorageError;

const FILE_SUFFIX: &str = ".json";
const TEMP_SUFFIX: &str = ".tmp";

/// Default storage directory: `<data_local_dir>/pinboard/storage`.
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pinboard")
        .join("storage")
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at [`default_storage_dir`].
    pub fn open_default() -> Self {
        Self::new(default_storage_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{FILE_SUFFIX}", urlencoding::encode(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let mut tmp = path.clone().into_os_string();
        tmp.push(TEMP_SUFFIX);
        let tmp = PathBuf::from(tmp);
        let written = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            // Best effort; the original error is the one worth reporting.
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(encoded) = name.strip_suffix(FILE_SUFFIX) else {
                continue;
            };
            match urlencoding::decode(encoded) {
                Ok(key) => keys.push(key.into_owned()),
                Err(e) => tracing::debug!("skipping undecodable storage file {name}: {e}"),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("missing").unwrap(), None);
        store.set("pinboard-positions", "{}").unwrap();
        assert_eq!(store.get("pinboard-positions").unwrap().as_deref(), Some("{}"));

        store.remove("pinboard-positions").unwrap();
        store.remove("pinboard-positions").unwrap();
        assert_eq!(store.get("pinboard-positions").unwrap(), None);
    }

    #[test]
    fn test_keys_round_trip_through_file_names() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("a key/with:odd chars", "1").unwrap();
        store.set("plain", "2").unwrap();

        let keys = store.keys().unwrap();
        assert_eq!(keys, vec!["a key/with:odd chars".to_string(), "plain".to_string()]);
    }

    #[test]
    fn test_keys_on_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("never-created"));
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        // A non-empty directory where the value file should go makes rename fail.
        let blocker = store.path_for("k");
        fs::create_dir_all(blocker.join("occupied")).unwrap();

        assert!(store.set("k", "1").is_err());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_second_handle_sees_writes() {
        let dir = tempdir().unwrap();
        FileStore::new(dir.path()).set("k", "\"v\"").unwrap();
        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("\"v\""));
    }
}
