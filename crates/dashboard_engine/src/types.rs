use std::path::PathBuf;

use dashboard_core::{LoadRequestId, Project, ProjectAction, ProjectId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Network unreachable, timeout, or a body that could not be decoded.
    #[error("network error: {message}")]
    Transport { message: String },
    /// Non-2xx answer to the project list request.
    #[error("failed to load projects (http status {status}){}", detail_suffix(.detail))]
    Load { status: u16, detail: Option<String> },
    /// Non-2xx answer to a mutation, or a mutation rejected before sending.
    #[error("{operation} failed{}{}", status_suffix(.status), detail_suffix(.detail))]
    Mutation {
        operation: &'static str,
        status: Option<u16>,
        detail: Option<String>,
    },
}

impl RepositoryError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RepositoryError::Transport { .. } => None,
            RepositoryError::Load { status, .. } => Some(*status),
            RepositoryError::Mutation { status, .. } => *status,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" (http status {status})"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ProjectsLoaded {
        request_id: LoadRequestId,
        result: Result<Vec<Project>, RepositoryError>,
    },
    /// Downloads report where the artifact was saved.
    ActionCompleted {
        action: ProjectAction,
        project_id: ProjectId,
        result: Result<Option<PathBuf>, String>,
    },
    UploadProgress {
        percent: u8,
    },
    UploadCompleted {
        result: Result<ProjectId, String>,
    },
}
