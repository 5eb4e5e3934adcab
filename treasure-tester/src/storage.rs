//! File-backed durable store: one JSON file per key inside a directory.
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use treasure_game::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path, source: io::Error) -> FileStoreError {
    FileStoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir).map_err(|err| io_error(&self.dir, err))?;
        let path = self.path_for(key);
        // Write then rename so a crash never leaves a half-written record.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(|err| io_error(&staging, err))?;
        fs::rename(&staging, &path).map_err(|err| io_error(&path, err))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(io_error(&path, err)),
            _ => Ok(()),
        }
    }
}
