use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use dashboard_core::ProjectStatus;
use dashboard_engine::{
    ApiSettings, Credential, EngineEvent, Persistence, ProgressSink, ProjectRepository,
    RepositoryError, ReqwestProjectRepository, TokenStore,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn signed_in(token: &str) -> Arc<TokenStore> {
    let tokens = TokenStore::in_memory();
    tokens
        .remember(&Credential::new(token), Persistence::Session)
        .unwrap();
    Arc::new(tokens)
}

fn repository(server: &MockServer, tokens: Arc<TokenStore>) -> ReqwestProjectRepository {
    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    let fixed = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    ReqwestProjectRepository::new(settings, tokens)
        .unwrap()
        .with_clock(Arc::new(move || fixed))
}

#[tokio::test]
async fn list_sends_bearer_token_and_normalizes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[
                {"id": "a", "filename": "Report.docx", "created_at": "2024-03-09T14:05:00Z", "status": "processing"},
                {"id": 2, "createdAt": null}
            ]"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let projects = repository(&server, signed_in("tok")).list().await.unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, "a");
    assert_eq!(projects[0].status, ProjectStatus::Processing);
    assert_eq!(
        projects[0].created_at,
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    );
    assert_eq!(projects[1].id, "2");
    assert_eq!(projects[1].display_name(), "Untitled Project");
    assert_eq!(
        projects[1].created_at,
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn list_without_credential_still_sends_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(401).set_body_raw(
            r#"{"detail": "Not authenticated"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = repository(&server, Arc::new(TokenStore::in_memory()))
        .list()
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RepositoryError::Load {
            status: 401,
            detail: Some("Not authenticated".to_string()),
        }
    );
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn list_error_without_detail_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let err = repository(&server, signed_in("tok"))
        .list()
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RepositoryError::Load {
            status: 500,
            detail: None
        }
    );
    assert_eq!(err.to_string(), "failed to load projects (http status 500)");
}

#[tokio::test]
async fn malformed_list_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"projects": []}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let err = repository(&server, signed_in("tok"))
        .list()
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn slow_list_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    };
    let repo = ReqwestProjectRepository::new(settings, signed_in("tok")).unwrap();

    let err = repo.list().await.unwrap_err();
    assert!(matches!(err, RepositoryError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let settings = ApiSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
    };
    let repo = ReqwestProjectRepository::new(settings, signed_in("tok")).unwrap();

    let err = repo.list().await.unwrap_err();
    assert!(matches!(err, RepositoryError::Transport { .. }), "{err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn remove_and_duplicate_hit_their_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/delete-project/p1"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/duplicate-project/p1"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"project_id": "p2"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let repo = repository(&server, signed_in("tok"));
    repo.remove("p1").await.unwrap();
    repo.duplicate("p1").await.unwrap();
}

#[tokio::test]
async fn rejected_mutation_carries_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/delete-project/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            r#"{"detail": "Project not found"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let err = repository(&server, signed_in("tok"))
        .remove("gone")
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "delete failed (http status 404): Project not found"
    );
}

#[tokio::test]
async fn download_returns_raw_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download-pdf/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7 body".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let payload = repository(&server, signed_in("tok"))
        .download_artifact("p1")
        .await
        .unwrap();

    assert_eq!(&payload[..], b"%PDF-1.7 body");
}

#[tokio::test]
async fn upload_posts_multipart_file_and_reports_progress() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_string_contains(r#"name="file""#))
        .and(body_string_contains(r#"filename="Thesis.docx""#))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"project_id": "new-1"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let sink = TestSink::default();
    let id = repository(&server, signed_in("tok"))
        .create_project("Thesis.docx", b"PK docx bytes".to_vec(), &sink)
        .await
        .unwrap();

    assert_eq!(id, "new-1");
    assert_eq!(
        sink.take(),
        vec![
            EngineEvent::UploadProgress { percent: 0 },
            EngineEvent::UploadProgress { percent: 100 },
        ]
    );
}

#[tokio::test]
async fn upload_rejects_other_document_types_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let sink = TestSink::default();
    let err = repository(&server, signed_in("tok"))
        .create_project("notes.pdf", b"%PDF".to_vec(), &sink)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RepositoryError::Mutation {
            operation: "upload",
            status: None,
            detail: Some("only .docx documents can be uploaded".to_string()),
        }
    );
    assert!(sink.take().is_empty());
}
