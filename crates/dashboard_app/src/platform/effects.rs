use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use dashboard_core::{Effect, Msg, ProjectAction};
use dashboard_engine::{EngineEvent, EngineHandle};
use dashboard_logging::{dashboard_info, dashboard_warn};
use url::Url;

use super::ui::constants::EDITOR_SEGMENT;

/// Executes core effects on the engine and feeds results back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    base_url: Url,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, base_url: Url, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self { engine, base_url };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    /// Returns editor locations the adapter should present to the user.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut navigations = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchProjects { request_id } => {
                    self.engine.fetch_projects(request_id);
                }
                Effect::DeleteProject { project_id } => {
                    dashboard_info!("Deleting project {}", project_id);
                    self.engine.run_action(ProjectAction::Delete, project_id);
                }
                Effect::DuplicateProject { project_id } => {
                    self.engine.run_action(ProjectAction::Duplicate, project_id);
                }
                Effect::DownloadArtifact { project_id } => {
                    self.engine.run_action(ProjectAction::Download, project_id);
                }
                Effect::UploadDocument { path } => {
                    dashboard_info!("Uploading {}", path.display());
                    self.engine.upload(path);
                }
                Effect::OpenProject { project_id } => {
                    navigations.push(editor_url(&self.base_url, &project_id));
                }
            }
        }
        navigations
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProjectsLoaded { request_id, result } => match result {
            Ok(projects) => Msg::ProjectsLoaded {
                request_id,
                projects,
            },
            Err(err) => {
                dashboard_warn!("Load {} failed: {}", request_id, err);
                Msg::LoadFailed {
                    request_id,
                    message: err.to_string(),
                }
            }
        },
        EngineEvent::ActionCompleted {
            action,
            project_id,
            result,
        } => match result {
            Ok(saved) => Msg::ActionSucceeded {
                action,
                project_id,
                detail: saved.map(|path| path.display().to_string()),
            },
            Err(message) => {
                dashboard_warn!("{} of {} failed: {}", action.verb(), project_id, message);
                Msg::ActionFailed {
                    action,
                    project_id,
                    message,
                }
            }
        },
        EngineEvent::UploadProgress { percent } => Msg::UploadProgress { percent },
        EngineEvent::UploadCompleted { result } => Msg::UploadDone { result },
    }
}

/// Editor view for one project: `{base}/ide?project={id}`.
pub fn editor_url(base_url: &Url, project_id: &str) -> String {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(EDITOR_SEGMENT);
    }
    url.query_pairs_mut().append_pair("project", project_id);
    url.into()
}
