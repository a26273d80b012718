use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0:?} exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot write {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Downloaded artifacts, saved under one directory.
///
/// Each save goes through a temp file in the same directory and is renamed
/// into place, so a reader never sees a half-written artifact and a repeated
/// download of the same name replaces the earlier copy.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if needed.
    pub fn prepare(&self) -> Result<(), StoreError> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::NotADirectory(self.dir.clone())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.dir).map_err(|source| self.io_error(&self.dir, source))
            }
            Err(source) => Err(self.io_error(&self.dir, source)),
        }
    }

    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        self.prepare()?;
        let target = self.dir.join(filename);

        let mut tmp =
            NamedTempFile::new_in(&self.dir).map_err(|source| self.io_error(&self.dir, source))?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|source| self.io_error(tmp.path(), source))?;
        tmp.persist(&target)
            .map_err(|err| self.io_error(&target, err.error))?;
        Ok(target)
    }

    fn io_error(&self, path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
