use chrono::{DateTime, Utc};

use crate::{Notice, Phase, Project, ProjectId, ProjectStatus, SortKey};

/// Card timestamp format, e.g. `Jan 5, 2024, 09:30 AM`.
pub const CREATED_AT_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardViewModel {
    pub phase: Phase,
    pub query: String,
    pub sort_key: SortKey,
    pub total_count: usize,
    pub cards: Vec<ProjectCardView>,
    pub load_error: Option<String>,
    pub notice: Option<Notice>,
    pub upload: Option<UploadView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCardView {
    pub project_id: ProjectId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub created_label: String,
    pub status: ProjectStatus,
    pub status_label: &'static str,
}

impl ProjectCardView {
    pub(crate) fn from_project(project: &Project) -> Self {
        Self {
            project_id: project.id.clone(),
            title: project.display_name().to_string(),
            created_at: project.created_at,
            created_label: project.created_at.format(CREATED_AT_FORMAT).to_string(),
            status: project.status,
            status_label: project.status.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadView {
    pub file_name: String,
    pub percent: u8,
}
