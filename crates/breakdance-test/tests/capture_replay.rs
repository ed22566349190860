//! A test suite recorded against a live service and replayed offline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use breakdance_config::SnapshotConfig;
use breakdance_snapshot::{HandlerTransport, SnapshotError};
use breakdance_surface::fixtures;
use breakdance_test::{assert_public_api_matches, TestClient, TestError};
use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use serde_json::json;
use tempfile::TempDir;

fn config(dir: &TempDir) -> SnapshotConfig {
    SnapshotConfig {
        root: dir.path().to_path_buf(),
        retry_initial_delay_ms: 1,
        ..SnapshotConfig::default()
    }
}

fn teams_service(calls: Arc<AtomicUsize>) -> HandlerTransport {
    HandlerTransport::new(move |request| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            let body = match request.uri().query() {
                Some(query) if query.contains("expand") => {
                    json!({"value": [{"Name": "Rangers", "Players": [{"Name": "Ada"}]}]})
                }
                _ => json!({"value": [{"Name": "Rangers"}]}),
            };
            http::Response::builder()
                .status(StatusCode::OK)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(body.to_string())))
                .map_err(SnapshotError::from)
        }
    })
}

#[tokio::test]
async fn recorded_session_replays_offline() {
    let dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let live = TestClient::capturing(teams_service(Arc::clone(&calls)), &config(&dir))
        .with_base_url("https://league.example")
        .with_default_header("Accept", "application/json");
    live.get("/api/Teams").send().await.assert_success();
    live.get("/api/Teams")
        .query("$expand", "Players")
        .send()
        .await
        .assert_json_field("value.0.Players.0.Name", &json!("Ada"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert!(dir
        .path()
        .join("league.example/api/Teams/Players/root.json")
        .is_file());

    let offline = TestClient::replaying(&config(&dir))
        .with_base_url("https://league.example")
        .with_default_header("Accept", "application/json");
    offline
        .get("/api/Teams")
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_content_type("application/json")
        .assert_json_field("value.0.Name", &json!("Rangers"));
    offline
        .get("/api/Teams")
        .query("$expand", "Players")
        .send()
        .await
        .assert_json_field("value.0.Players.0.Name", &json!("Ada"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn replaying_unrecorded_request_reports_missing_snapshot() {
    let dir = TempDir::new().unwrap();
    let offline = TestClient::replaying(&config(&dir));
    let err = offline
        .get("https://league.example/api/Coaches")
        .try_send()
        .await
        .unwrap_err();
    assert!(err.is_snapshot_missing());
}

#[tokio::test]
async fn relative_request_without_base_url_is_rejected() {
    let dir = TempDir::new().unwrap();
    let offline = TestClient::replaying(&config(&dir));
    let err = offline.get("/api/Teams").try_send().await.unwrap_err();
    assert!(matches!(
        err,
        TestError::Snapshot(SnapshotError::InvalidRequest { .. })
    ));
}

#[test]
fn sample_surface_matches_checked_in_baseline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Breakdance.Samples.bsl");
    std::fs::write(&path, fixtures::SAMPLE_REPORT.replace('\n', "\r\n")).unwrap();
    assert_public_api_matches(&fixtures::sample_assembly(), &path);
}
