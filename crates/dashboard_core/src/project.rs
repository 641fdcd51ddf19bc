use chrono::{DateTime, Utc};

pub type ProjectId = String;

/// Shown in place of a missing or blank filename.
pub const UNTITLED_LABEL: &str = "Untitled Project";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: ProjectStatus,
}

impl Project {
    pub fn display_name(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNTITLED_LABEL)
    }

    /// Filename used for name ordering; missing names sort as empty.
    pub(crate) fn sort_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectStatus {
    Pending,
    Processing,
    #[default]
    Completed,
    Error,
}

impl ProjectStatus {
    /// Maps the wire value; anything unrecognised counts as completed.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("pending") => ProjectStatus::Pending,
            Some("processing") => ProjectStatus::Processing,
            Some("error") => ProjectStatus::Error,
            _ => ProjectStatus::Completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Pending => "Pending",
            ProjectStatus::Processing => "Processing",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Error => "Error",
        }
    }
}
