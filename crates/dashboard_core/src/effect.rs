use std::path::PathBuf;

use crate::{LoadRequestId, ProjectId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchProjects { request_id: LoadRequestId },
    DeleteProject { project_id: ProjectId },
    DuplicateProject { project_id: ProjectId },
    DownloadArtifact { project_id: ProjectId },
    OpenProject { project_id: ProjectId },
    UploadDocument { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    Delete,
    Duplicate,
    Download,
}

impl ProjectAction {
    pub fn verb(self) -> &'static str {
        match self {
            ProjectAction::Delete => "delete",
            ProjectAction::Duplicate => "duplicate",
            ProjectAction::Download => "download",
        }
    }

    pub(crate) fn success_text(self) -> &'static str {
        match self {
            ProjectAction::Delete => "Project deleted successfully!",
            ProjectAction::Duplicate => "Project duplicated successfully!",
            ProjectAction::Download => "Download complete.",
        }
    }
}
