//! JSON file configuration store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use sweep_core::{Error, Result};
use tempfile::NamedTempFile;

use super::{Changeset, ConfigStore, KeyPath, lookup};
use crate::TRACING_TARGET_STORE;

/// Configuration store persisted as a JSON document on disk.
///
/// Every read goes to disk. A save rewrites the whole document into a
/// temporary file next to the target and renames it into place, so readers
/// see either the old or the new document, never a partial one.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file does not need to exist yet; a missing file reads as empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Value> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Value::Object(Map::new()));
            }
            Err(err) => {
                return Err(Error::persistence()
                    .with_message(format!("cannot read {}", self.path.display()))
                    .with_source(err));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            Error::serialization()
                .with_message(format!("{} is not valid JSON", self.path.display()))
                .with_source(err)
        })
    }

    fn write_document(&self, document: &Value) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let persistence = |message: &str, err: std::io::Error| {
            Error::persistence()
                .with_message(format!("{message} {}", self.path.display()))
                .with_source(err)
        };

        let mut bytes = serde_json::to_vec_pretty(document)
            .map_err(|err| Error::serialization().with_source(err))?;
        bytes.push(b'\n');

        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|err| persistence("cannot create temporary file for", err))?;
        temp.write_all(&bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|err| persistence("cannot write", err))?;
        temp.persist(&self.path)
            .map_err(|err| persistence("cannot replace", err.error))?;

        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn get(&self, path: &KeyPath) -> Result<Option<Value>> {
        let document = self.read_document()?;
        Ok(lookup(&document, path).cloned())
    }

    fn save(&self, changes: Changeset) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::persistence().with_message("file store lock poisoned"))?;

        let mut document = self.read_document()?;
        changes.apply(&mut document);
        self.write_document(&document)?;

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            path = %self.path.display(),
            writes = changes.len(),
            "File store saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sweep_core::ErrorKind;

    use super::*;

    const ENABLED: KeyPath = KeyPath::new(&["job", "enabled"]);
    const BUCKET: KeyPath = KeyPath::new(&["job", "storage", "bucket"]);

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("config.json"));

        assert_eq!(store.get(&ENABLED).unwrap(), None);
    }

    #[test]
    fn test_save_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        FileStore::new(&path)
            .save(Changeset::new().set(ENABLED, true).set(BUCKET, "archive"))
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(&ENABLED).unwrap(), Some(json!(true)));
        assert_eq!(reopened.get(&BUCKET).unwrap(), Some(json!("archive")));
    }

    #[test]
    fn test_save_preserves_unrelated_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "other": { "keep": 1 } }"#).unwrap();

        let store = FileStore::new(&path);
        store.save(Changeset::new().set(ENABLED, false)).unwrap();

        let document: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(document["other"]["keep"], json!(1));
        assert_eq!(document["job"]["enabled"], json!(false));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(&path);
        let err = store.get(&ENABLED).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);

        // A failed save leaves the broken file as it was.
        assert!(store.save(Changeset::new().set(ENABLED, true)).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("config.json"));

        store.save(Changeset::new().set(ENABLED, true)).unwrap();
        store.save(Changeset::new().set(ENABLED, false)).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
