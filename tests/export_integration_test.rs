use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;
use user_export::domain::model::{default_users, ExportVariant};
use user_export::{
    DirectoryView, DownloadDir, ExportConfig, ExportController, ExportErrorKind, TriggerOutcome,
};

fn controller_for(
    base_url: &str,
    variant: ExportVariant,
    temp_dir: &TempDir,
) -> ExportController<DownloadDir> {
    ExportController::new(
        ExportConfig::for_variant(base_url, variant),
        DownloadDir::new(temp_dir.path()),
    )
}

#[tokio::test]
async fn test_csv_export_saves_file_and_shows_no_error() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let body = "id,name,email\n1,Alice,al@example.com\n";
    assert_eq!(body.len(), 37);

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/users/export");
        then.status(200).header("Content-Type", "text/csv").body(body);
    });

    let controller = controller_for(&server.base_url(), ExportVariant::Csv, &temp_dir);
    let view = DirectoryView::new(default_users(), controller);

    let outcome = view.trigger_export().await;

    assert_eq!(outcome, TriggerOutcome::Completed);
    api_mock.assert();

    let saved = std::fs::read(temp_dir.path().join("users.csv")).unwrap();
    assert_eq!(saved, body.as_bytes());

    let state = view.state();
    assert!(!state.busy);
    assert!(state.last_error.is_none());
    assert!(!view.render().contains("Error:"));
    assert_eq!(view.exporter().target().live_references(), 0);
}

#[tokio::test]
async fn test_server_error_message_is_displayed() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/users/export");
        then.status(500)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"message": "export disabled"}));
    });

    let controller = controller_for(&server.base_url(), ExportVariant::Csv, &temp_dir);
    let view = DirectoryView::new(default_users(), controller);

    let outcome = view.trigger_export().await;

    api_mock.assert();
    match outcome {
        TriggerOutcome::Failed(e) => {
            assert_eq!(e.kind, ExportErrorKind::Http);
            assert_eq!(e.message, "export disabled");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let state = view.state();
    assert!(!state.busy);
    assert_eq!(state.last_error.as_deref(), Some("export disabled"));
    assert!(view.render().contains("Error: export disabled"));
    assert!(!temp_dir.path().join("users.csv").exists());
    assert_eq!(view.exporter().target().live_references(), 0);
}

#[tokio::test]
async fn test_markdown_export_rejects_json() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/users/export");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"users":[]}"#);
    });

    let controller = controller_for(&server.base_url(), ExportVariant::Markdown, &temp_dir);

    let err = controller.export().await.unwrap_err();

    assert_eq!(err.kind, ExportErrorKind::UnexpectedType);
    assert_eq!(err.message, "application/json");
    assert!(!temp_dir.path().join("user_list.md").exists());
    assert_eq!(controller.target().live_references(), 0);
}

#[tokio::test]
async fn test_markdown_export_saves_fixed_filename() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/users/export");
        then.status(200)
            .header("Content-Type", "text/markdown; charset=utf-8")
            .header("Content-Disposition", "attachment; filename=\"report-2026.md\"")
            .body("| Name | Email |\n");
    });

    let controller = controller_for(&server.base_url(), ExportVariant::Markdown, &temp_dir);
    controller.export().await.unwrap();

    assert!(temp_dir.path().join("user_list.md").exists());
    assert!(!temp_dir.path().join("report-2026.md").exists());
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let temp_dir = TempDir::new().unwrap();

    // 取得一個沒人監聽的埠
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let controller = controller_for(
        &format!("http://127.0.0.1:{}", port),
        ExportVariant::Csv,
        &temp_dir,
    );
    let view = DirectoryView::new(default_users(), controller);

    let outcome = view.trigger_export().await;

    match outcome {
        TriggerOutcome::Failed(e) => {
            assert_eq!(e.kind, ExportErrorKind::Network);
            assert!(e.message.starts_with("no response received"));
            assert!(!e.message.contains("HTTP error"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!view.state().busy);
}

#[tokio::test]
async fn test_second_trigger_through_view_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/users/export");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body("a,b\n")
            .delay(Duration::from_millis(100));
    });

    let controller = controller_for(&server.base_url(), ExportVariant::Csv, &temp_dir);
    let view = DirectoryView::new(default_users(), controller);

    let (first, second) = tokio::join!(view.trigger_export(), view.trigger_export());

    assert_eq!(first, TriggerOutcome::Completed);
    assert_eq!(second, TriggerOutcome::Ignored);
    api_mock.assert_hits(1);
    assert!(view.action_enabled());
}

#[tokio::test]
async fn test_direct_concurrent_exports_both_complete() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/users/export");
        then.status(200)
            .header("Content-Type", "application/vnd.openxmlformats-officedocument.presentationml.presentation")
            .body("PK\u{3}\u{4}slides")
            .delay(Duration::from_millis(50));
    });

    let controller = controller_for(&server.base_url(), ExportVariant::Ppt, &temp_dir);

    let (first, second) = tokio::join!(controller.export(), controller.export());

    assert!(first.is_ok());
    assert!(second.is_ok());
    api_mock.assert_hits(2);
    assert!(temp_dir.path().join("users.ppt").exists());
    assert_eq!(controller.target().live_references(), 0);
}
