use crate::{AppState, Effect, Msg, Notice, NoticeSeverity, ProjectAction};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    // Outside a session only activation is meaningful; late results are dropped.
    if !state.is_active() && !matches!(msg, Msg::Activated | Msg::Deactivated) {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Activated => {
            state.activate();
            start_load(&mut state)
        }
        Msg::LoadRequested | Msg::RetryClicked => start_load(&mut state),
        Msg::Deactivated => {
            state.reset_session();
            Vec::new()
        }
        Msg::ProjectsLoaded {
            request_id,
            projects,
        } => {
            if !state.accepts_result(request_id) {
                return (state, Vec::new());
            }
            state.apply_loaded(projects);
            follow_up_reload(&mut state)
        }
        Msg::LoadFailed {
            request_id,
            message,
        } => {
            if !state.accepts_result(request_id) {
                return (state, Vec::new());
            }
            // Stale source stays visible behind the error.
            state.apply_load_failure(message);
            follow_up_reload(&mut state)
        }
        Msg::QueryChanged(query) => {
            state.set_query(&query);
            Vec::new()
        }
        Msg::SortChanged(sort_key) => {
            state.set_sort_key(sort_key);
            Vec::new()
        }
        Msg::OpenRequested(project_id) => vec![Effect::OpenProject { project_id }],
        Msg::DeleteConfirmed(project_id) => vec![Effect::DeleteProject { project_id }],
        Msg::DuplicateRequested(project_id) => vec![Effect::DuplicateProject { project_id }],
        Msg::DownloadRequested(project_id) => vec![Effect::DownloadArtifact { project_id }],
        Msg::ActionSucceeded { action, detail, .. } => {
            let text = match detail {
                Some(detail) => format!("{} {}", action.success_text(), detail),
                None => action.success_text().to_string(),
            };
            state.set_notice(Some(Notice {
                severity: NoticeSeverity::Info,
                text,
            }));
            resync_after_mutation(&mut state)
        }
        Msg::ActionFailed {
            action,
            project_id,
            message,
        } => {
            state.set_notice(Some(failure_notice(action, &project_id, &message)));
            Vec::new()
        }
        Msg::UploadRequested(path) => {
            if state.is_uploading() {
                return (state, Vec::new());
            }
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            state.start_upload(file_name);
            vec![Effect::UploadDocument { path }]
        }
        Msg::UploadProgress { percent } => {
            state.set_upload_percent(percent);
            Vec::new()
        }
        Msg::UploadDone { result } => {
            if !state.is_uploading() {
                return (state, Vec::new());
            }
            state.finish_upload();
            match result {
                Ok(project_id) => {
                    state.set_notice(Some(Notice {
                        severity: NoticeSeverity::Info,
                        text: "Upload complete.".to_string(),
                    }));
                    let mut effects = resync_after_mutation(&mut state);
                    effects.push(Effect::OpenProject { project_id });
                    effects
                }
                Err(message) => {
                    state.set_notice(Some(Notice {
                        severity: NoticeSeverity::Error,
                        text: format!("Upload failed: {message}"),
                    }));
                    Vec::new()
                }
            }
        }
        Msg::NoticeDismissed => {
            if state.notice().is_some() {
                state.set_notice(None);
            }
            Vec::new()
        }
    };

    (state, effects)
}

/// Single-flight: a load while another is outstanding emits nothing.
fn start_load(state: &mut AppState) -> Vec<Effect> {
    match state.begin_load() {
        Some(request_id) => vec![Effect::FetchProjects { request_id }],
        None => Vec::new(),
    }
}

/// Follow-up load after a mutation; queued behind a load already in flight.
fn resync_after_mutation(state: &mut AppState) -> Vec<Effect> {
    if state.is_loading() {
        state.queue_reload();
        Vec::new()
    } else {
        start_load(state)
    }
}

fn follow_up_reload(state: &mut AppState) -> Vec<Effect> {
    if state.take_queued_reload() {
        start_load(state)
    } else {
        Vec::new()
    }
}

fn failure_notice(action: ProjectAction, project_id: &str, message: &str) -> Notice {
    Notice {
        severity: NoticeSeverity::Error,
        text: format!("Failed to {} project {project_id}: {message}", action.verb()),
    }
}
