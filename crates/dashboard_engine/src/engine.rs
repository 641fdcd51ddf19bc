use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use dashboard_core::{LoadRequestId, ProjectAction, ProjectId};
use dashboard_logging::{dashboard_debug, dashboard_warn};

use crate::download::DownloadSink;
use crate::repository::{ensure_docx, ChannelProgressSink, ProjectRepository};
use crate::EngineEvent;

enum EngineCommand {
    FetchProjects { request_id: LoadRequestId },
    Action { action: ProjectAction, project_id: ProjectId },
    Upload { path: PathBuf },
}

/// Runs repository calls on a background runtime and queues their results.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        downloads: Arc<dyn DownloadSink>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let repository = repository.clone();
                let downloads = downloads.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(repository.as_ref(), downloads.as_ref(), command, event_tx)
                        .await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn fetch_projects(&self, request_id: LoadRequestId) {
        self.submit(EngineCommand::FetchProjects { request_id });
    }

    pub fn run_action(&self, action: ProjectAction, project_id: impl Into<ProjectId>) {
        self.submit(EngineCommand::Action {
            action,
            project_id: project_id.into(),
        });
    }

    pub fn upload(&self, path: PathBuf) {
        self.submit(EngineCommand::Upload { path });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        let rx = self.event_rx.lock().ok()?;
        rx.try_recv().ok()
    }

    fn submit(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            dashboard_warn!("Engine worker has stopped; command dropped");
        }
    }
}

async fn handle_command(
    repository: &dyn ProjectRepository,
    downloads: &dyn DownloadSink,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchProjects { request_id } => {
            dashboard_debug!("Fetching projects for request {}", request_id);
            let result = repository.list().await;
            EngineEvent::ProjectsLoaded { request_id, result }
        }
        EngineCommand::Action { action, project_id } => {
            let result = run_action(repository, downloads, action, &project_id).await;
            EngineEvent::ActionCompleted {
                action,
                project_id,
                result,
            }
        }
        EngineCommand::Upload { path } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = upload(repository, &sink, &path).await;
            EngineEvent::UploadCompleted { result }
        }
    };
    let _ = event_tx.send(event);
}

async fn run_action(
    repository: &dyn ProjectRepository,
    downloads: &dyn DownloadSink,
    action: ProjectAction,
    project_id: &str,
) -> Result<Option<PathBuf>, String> {
    match action {
        ProjectAction::Delete => repository
            .remove(project_id)
            .await
            .map(|()| None)
            .map_err(|err| err.to_string()),
        ProjectAction::Duplicate => repository
            .duplicate(project_id)
            .await
            .map(|()| None)
            .map_err(|err| err.to_string()),
        ProjectAction::Download => {
            let payload = repository
                .download_artifact(project_id)
                .await
                .map_err(|err| err.to_string())?;
            downloads
                .save(project_id, &payload)
                .map(Some)
                .map_err(|err| format!("could not save download: {err}"))
        }
    }
}

async fn upload(
    repository: &dyn ProjectRepository,
    sink: &ChannelProgressSink,
    path: &Path,
) -> Result<ProjectId, String> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| format!("{} is not a file", path.display()))?;
    ensure_docx(&file_name).map_err(|err| err.to_string())?;
    let content = tokio::fs::read(path)
        .await
        .map_err(|err| format!("could not read {}: {err}", path.display()))?;
    repository
        .create_project(&file_name, content, sink)
        .await
        .map_err(|err| err.to_string())
}
