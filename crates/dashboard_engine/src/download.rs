use std::path::PathBuf;

use crate::filename::download_filename;
use crate::persist::{PersistError, StateDir};

/// Destination for downloaded artifacts.
pub trait DownloadSink: Send + Sync {
    fn save(&self, project_id: &str, payload: &[u8]) -> Result<PathBuf, PersistError>;
}

/// Saves artifacts as `project-{id}.pdf` in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownloadSink {
    dir: StateDir,
}

impl DirectoryDownloadSink {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir: StateDir::new(dir),
        }
    }
}

impl DownloadSink for DirectoryDownloadSink {
    fn save(&self, project_id: &str, payload: &[u8]) -> Result<PathBuf, PersistError> {
        self.dir.write(&download_filename(project_id), payload)
    }
}
