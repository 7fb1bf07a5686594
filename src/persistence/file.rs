//! JSON file per key under a directory (native builds)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ScoreStore;
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ScoreStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(json)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Sibling write + rename: readers see the old record or the new one
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pocket-arcade-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_key_reads_none() {
        let store = FileStore::new(scratch_dir("missing"));
        assert!(store.read("snakeHighScore").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::new(&dir);
        store.write("snakeHighScore", r#"{"highScore":30,"gamesPlayed":1}"#).unwrap();
        assert_eq!(
            store.read("snakeHighScore").unwrap().as_deref(),
            Some(r#"{"highScore":30,"gamesPlayed":1}"#)
        );
        assert!(dir.join("snakeHighScore.json").exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
