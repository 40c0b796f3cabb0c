use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{BlobStorage, StoreError};

/// Storage keeping each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that backs `key`.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for empty keys or keys containing path separators.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename so readers never see a partial blob.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "wrote blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tempdir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap_or_else(|err| panic!("must create tempdir: {err}"))
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempdir();
        let storage = FileStorage::new(dir.path());
        let value = storage
            .get("tasks")
            .unwrap_or_else(|err| panic!("get must succeed: {err}"));
        assert!(value.is_none());
    }

    #[test]
    fn set_creates_directory_and_overwrites() {
        let dir = tempdir();
        let storage = FileStorage::new(dir.path().join("nested").join("data"));
        for value in ["[1]", "[2]"] {
            storage
                .set("tasks", value)
                .unwrap_or_else(|err| panic!("set must succeed: {err}"));
        }
        let stored = storage
            .get("tasks")
            .unwrap_or_else(|err| panic!("get must succeed: {err}"));
        assert_eq!(stored.as_deref(), Some("[2]"));
        assert!(!storage.dir().join("tasks.json.tmp").exists());
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let storage = FileStorage::new("/tmp/unused");
        for key in ["", "..", "a/b", "a\\b"] {
            assert!(
                matches!(storage.path_for(key), Err(StoreError::InvalidKey(_))),
                "key {key:?} must be rejected"
            );
        }
        assert!(storage.path_for("tasks").is_ok());
    }
}
