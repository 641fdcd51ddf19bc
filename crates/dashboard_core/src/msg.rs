use std::path::PathBuf;

use crate::{LoadRequestId, Project, ProjectAction, ProjectId, SortKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Dashboard became the active view; triggers the first load.
    Activated,
    /// User navigated away; the session state is torn down.
    Deactivated,
    /// Reload requested (button, keyboard, or follow-up).
    LoadRequested,
    /// User clicked Retry on the error affordance.
    RetryClicked,
    /// Repository delivered the collection for a load.
    ProjectsLoaded {
        request_id: LoadRequestId,
        projects: Vec<Project>,
    },
    /// Repository failed a load.
    LoadFailed {
        request_id: LoadRequestId,
        message: String,
    },
    /// User edited the search box.
    QueryChanged(String),
    /// User picked an ordering.
    SortChanged(SortKey),
    /// User clicked Edit on a card.
    OpenRequested(ProjectId),
    /// User confirmed deletion of a project.
    DeleteConfirmed(ProjectId),
    /// User clicked Duplicate on a card.
    DuplicateRequested(ProjectId),
    /// User clicked Download on a card.
    DownloadRequested(ProjectId),
    /// A mutation finished on the server.
    ActionSucceeded {
        action: ProjectAction,
        project_id: ProjectId,
        detail: Option<String>,
    },
    /// A mutation failed.
    ActionFailed {
        action: ProjectAction,
        project_id: ProjectId,
        message: String,
    },
    /// User picked a source document to upload.
    UploadRequested(PathBuf),
    /// Upload progress in percent.
    UploadProgress { percent: u8 },
    /// Upload finished with the new project id or an error message.
    UploadDone { result: Result<ProjectId, String> },
    /// User dismissed the current notice.
    NoticeDismissed,
}
