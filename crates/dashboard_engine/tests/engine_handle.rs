use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use chrono::DateTime;
use dashboard_core::{Project, ProjectAction, ProjectId, ProjectStatus};
use dashboard_engine::{
    download_filename, DirectoryDownloadSink, EngineEvent, EngineHandle, ProgressSink,
    ProjectRepository, RepositoryError,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct FakeRepository;

#[async_trait::async_trait]
impl ProjectRepository for FakeRepository {
    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(vec![Project {
            id: "p1".to_string(),
            filename: Some("Report.docx".to_string()),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            status: ProjectStatus::Completed,
        }])
    }

    async fn remove(&self, project_id: &str) -> Result<(), RepositoryError> {
        if project_id == "locked" {
            return Err(RepositoryError::Mutation {
                operation: "delete",
                status: Some(403),
                detail: None,
            });
        }
        Ok(())
    }

    async fn duplicate(&self, _project_id: &str) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn download_artifact(&self, _project_id: &str) -> Result<Bytes, RepositoryError> {
        Ok(Bytes::from_static(b"%PDF"))
    }

    async fn create_project(
        &self,
        file_name: &str,
        _content: Vec<u8>,
        sink: &dyn ProgressSink,
    ) -> Result<ProjectId, RepositoryError> {
        sink.emit(EngineEvent::UploadProgress { percent: 50 });
        Ok(format!("from-{file_name}"))
    }
}

fn engine(download_dir: &TempDir) -> EngineHandle {
    EngineHandle::new(
        Arc::new(FakeRepository),
        Arc::new(DirectoryDownloadSink::new(download_dir.path().to_path_buf())),
    )
    .unwrap()
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "engine produced no event");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn fetch_reports_request_id() {
    let temp = TempDir::new().unwrap();
    let engine = engine(&temp);

    engine.fetch_projects(7);

    match next_event(&engine) {
        EngineEvent::ProjectsLoaded { request_id, result } => {
            assert_eq!(request_id, 7);
            assert_eq!(result.unwrap().len(), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn failed_action_reports_message() {
    let temp = TempDir::new().unwrap();
    let engine = engine(&temp);

    engine.run_action(ProjectAction::Delete, "locked");

    assert_eq!(
        next_event(&engine),
        EngineEvent::ActionCompleted {
            action: ProjectAction::Delete,
            project_id: "locked".to_string(),
            result: Err("delete failed (http status 403)".to_string()),
        }
    );
}

#[test]
fn download_is_saved_to_directory() {
    let temp = TempDir::new().unwrap();
    let engine = engine(&temp);

    engine.run_action(ProjectAction::Download, "p1");

    let expected = temp.path().join(download_filename("p1"));
    assert_eq!(
        next_event(&engine),
        EngineEvent::ActionCompleted {
            action: ProjectAction::Download,
            project_id: "p1".to_string(),
            result: Ok(Some(expected.clone())),
        }
    );
    assert_eq!(fs::read(expected).unwrap(), b"%PDF");
}

#[test]
fn upload_reads_file_and_streams_progress() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("Draft.docx");
    fs::write(&source, b"PK").unwrap();
    let engine = engine(&temp);

    engine.upload(source);

    assert_eq!(
        next_event(&engine),
        EngineEvent::UploadProgress { percent: 50 }
    );
    assert_eq!(
        next_event(&engine),
        EngineEvent::UploadCompleted {
            result: Ok("from-Draft.docx".to_string()),
        }
    );
}

#[test]
fn upload_of_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let engine = engine(&temp);

    engine.upload(temp.path().join("missing.docx"));

    match next_event(&engine) {
        EngineEvent::UploadCompleted { result: Err(message) } => {
            assert!(message.contains("missing.docx"), "{message}");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn upload_rejects_non_docx_before_reading() {
    let temp = TempDir::new().unwrap();
    let engine = engine(&temp);

    engine.upload(temp.path().join("notes.pdf"));

    assert_eq!(
        next_event(&engine),
        EngineEvent::UploadCompleted {
            result: Err("upload failed: only .docx documents can be uploaded".to_string()),
        }
    );
}
