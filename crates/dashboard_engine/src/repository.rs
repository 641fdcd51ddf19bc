use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashboard_core::{Project, ProjectId};
use dashboard_logging::{dashboard_debug, dashboard_warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Response, Url};

use crate::token::TokenStore;
use crate::wire::{parse_error_detail, parse_projects, parse_upload_reply};
use crate::{EngineEvent, RepositoryError};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Backend collaborator for the project list and its mutations.
#[async_trait::async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All-or-nothing fetch of the collection.
    async fn list(&self) -> Result<Vec<Project>, RepositoryError>;

    /// Callers confirm destructive intent before calling.
    async fn remove(&self, project_id: &str) -> Result<(), RepositoryError>;

    async fn duplicate(&self, project_id: &str) -> Result<(), RepositoryError>;

    /// Rendered artifact, returned unparsed.
    async fn download_artifact(&self, project_id: &str) -> Result<Bytes, RepositoryError>;

    /// Uploads a `.docx` source document and returns the new project's id.
    async fn create_project(
        &self,
        file_name: &str,
        content: Vec<u8>,
        sink: &dyn ProgressSink,
    ) -> Result<ProjectId, RepositoryError>;
}

pub struct ReqwestProjectRepository {
    settings: ApiSettings,
    client: reqwest::Client,
    tokens: Arc<TokenStore>,
    clock: Clock,
}

impl ReqwestProjectRepository {
    pub fn new(settings: ApiSettings, tokens: Arc<TokenStore>) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RepositoryError::transport(err.to_string()))?;
        Ok(Self {
            settings,
            client,
            tokens,
            clock: Arc::new(Utc::now),
        })
    }

    /// Replaces the clock used for records without a usable timestamp.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RepositoryError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| RepositoryError::transport(format!("invalid base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| RepositoryError::transport("base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// A missing credential still sends `Bearer ` and lets the server reject it.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, RepositoryError> {
        request
            .header(AUTHORIZATION, bearer_value(&self.tokens.token()))
            .send()
            .await
            .map_err(map_reqwest_error)
    }

    async fn mutation(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, RepositoryError> {
        let response = self.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = error_detail(response).await;
        dashboard_warn!("{} rejected with status {}", operation, status);
        Err(RepositoryError::Mutation {
            operation,
            status: Some(status.as_u16()),
            detail,
        })
    }
}

#[async_trait::async_trait]
impl ProjectRepository for ReqwestProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let url = self.endpoint(&["projects"])?;
        let response = self.send(self.client.get(url)).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            return Err(RepositoryError::Load {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let projects = parse_projects(&body, (self.clock)())?;
        dashboard_debug!("Loaded {} projects", projects.len());
        Ok(projects)
    }

    async fn remove(&self, project_id: &str) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["delete-project", project_id])?;
        self.mutation("delete", self.client.delete(url)).await?;
        Ok(())
    }

    async fn duplicate(&self, project_id: &str) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["duplicate-project", project_id])?;
        self.mutation("duplicate", self.client.post(url)).await?;
        Ok(())
    }

    async fn download_artifact(&self, project_id: &str) -> Result<Bytes, RepositoryError> {
        let url = self.endpoint(&["download-pdf", project_id])?;
        let response = self.mutation("download", self.client.get(url)).await?;
        response.bytes().await.map_err(map_reqwest_error)
    }

    async fn create_project(
        &self,
        file_name: &str,
        content: Vec<u8>,
        sink: &dyn ProgressSink,
    ) -> Result<ProjectId, RepositoryError> {
        ensure_docx(file_name)?;

        let url = self.endpoint(&["upload"])?;
        let part = reqwest::multipart::Part::bytes(content).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        sink.emit(EngineEvent::UploadProgress { percent: 0 });
        let response = self
            .mutation("upload", self.client.post(url).multipart(form))
            .await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let project_id = parse_upload_reply(&body)?;
        sink.emit(EngineEvent::UploadProgress { percent: 100 });
        Ok(project_id)
    }
}

fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}

/// Uploads accept Word documents only; checked before any bytes are read or sent.
pub(crate) fn ensure_docx(file_name: &str) -> Result<(), RepositoryError> {
    if file_name.to_ascii_lowercase().ends_with(".docx") {
        return Ok(());
    }
    Err(RepositoryError::Mutation {
        operation: "upload",
        status: None,
        detail: Some("only .docx documents can be uploaded".to_string()),
    })
}

async fn error_detail(response: Response) -> Option<String> {
    let body = response.bytes().await.ok()?;
    parse_error_detail(&body)
}

fn map_reqwest_error(err: reqwest::Error) -> RepositoryError {
    if err.is_timeout() {
        return RepositoryError::transport(format!("request timed out: {err}"));
    }
    if err.is_decode() || err.is_body() {
        return RepositoryError::transport(format!("unreadable response: {err}"));
    }
    RepositoryError::transport(err.to_string())
}
