use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{}: {reason}", path.display())]
    Directory { path: PathBuf, reason: String },
    #[error("unreadable stored data: {0}")]
    Format(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl PersistError {
    fn directory(path: &Path, reason: impl ToString) -> Self {
        Self::Directory {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Creates `dir` when missing and proves it accepts new files.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => return Err(PersistError::directory(dir, "not a directory")),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| PersistError::directory(dir, err))?;
        }
        Err(err) => return Err(PersistError::directory(dir, err)),
    }
    NamedTempFile::new_in(dir)
        .map_err(|err| PersistError::directory(dir, format!("not writable: {err}")))?;
    Ok(())
}

/// A directory of small files owned by the dashboard: saved PDFs and the
/// remembered credential.
///
/// Writes land in a temp file that is renamed over the target, so a reader
/// sees either the old content or the new one. Reads and removals treat a
/// missing file as "nothing stored".
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>, PersistError> {
        match fs::read(self.path_of(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_dir(&self.root)?;

        let target = self.path_of(name);
        let mut staged = NamedTempFile::new_in(&self.root)?;
        staged.write_all(content)?;
        staged.as_file_mut().sync_all()?;
        staged.persist(&target).map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }

    /// Returns whether a file was actually removed.
    pub fn remove(&self, name: &str) -> Result<bool, PersistError> {
        match fs::remove_file(self.path_of(name)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
