use std::collections::HashSet;

use chrono::{DateTime, Utc};
use dashboard_core::{coerce_instant, Project, ProjectId, ProjectStatus, RawTimestamp};
use dashboard_logging::dashboard_warn;
use serde::Deserialize;
use serde_json::Value;

use crate::RepositoryError;

#[derive(Debug, Deserialize)]
struct ProjectRecord {
    id: WireId,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<RawTimestamp>,
    #[serde(default)]
    status: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    fn into_id(self) -> ProjectId {
        match self {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    project_id: WireId,
}

/// Decodes the project list; any malformed record fails the whole payload.
pub(crate) fn parse_projects(
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<Vec<Project>, RepositoryError> {
    let records: Vec<ProjectRecord> = serde_json::from_slice(body)
        .map_err(|err| RepositoryError::transport(format!("malformed project list: {err}")))?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut projects = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id.into_id();
        if !seen.insert(id.clone()) {
            dashboard_warn!("Dropping repeated project id {} from list payload", id);
            continue;
        }
        projects.push(Project {
            id,
            filename: record.filename,
            created_at: coerce_instant(record.created_at.as_ref(), now),
            status: ProjectStatus::from_wire(record.status.as_ref().and_then(Value::as_str)),
        });
    }
    Ok(projects)
}

/// Extracts the `detail` message of an error body, if there is one.
pub(crate) fn parse_error_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

pub(crate) fn parse_upload_reply(body: &[u8]) -> Result<ProjectId, RepositoryError> {
    serde_json::from_slice::<UploadReply>(body)
        .map(|reply| reply.project_id.into_id())
        .map_err(|err| RepositoryError::transport(format!("malformed upload reply: {err}")))
}
