//! Capture a live exchange, then replay it from disk.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use breakdance_config::SnapshotConfig;
use breakdance_snapshot::{
    CaptureHandler, HandlerTransport, PathCanonicalizer, ReplayHandler, SnapshotError, Transport,
    TransportRequest,
};
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;

fn request(uri: &str, accept: &str) -> TransportRequest {
    Request::get(uri)
        .header(ACCEPT, accept)
        .body(Bytes::new())
        .unwrap()
}

fn config(root: &std::path::Path) -> SnapshotConfig {
    SnapshotConfig {
        root: root.to_path_buf(),
        retry_initial_delay_ms: 1,
        ..SnapshotConfig::default()
    }
}

#[tokio::test]
async fn expand_query_captures_into_nested_directory() {
    let dir = TempDir::new().unwrap();
    let capture = CaptureHandler::from_config(
        HandlerTransport::fixed(StatusCode::OK, "{\"value\":[]}"),
        &config(dir.path()),
    );

    capture
        .send(request(
            "https://host/api/Teams?$expand=Players",
            "application/json",
        ))
        .await
        .unwrap();

    let file = dir.path().join("host/api/Teams/Players/root.json");
    assert_eq!(std::fs::read_to_string(file).unwrap(), "{\"value\":[]}");
}

#[tokio::test]
async fn metadata_document_captures_as_xml() {
    let dir = TempDir::new().unwrap();
    let capture = CaptureHandler::from_config(
        HandlerTransport::fixed(StatusCode::OK, "<edmx:Edmx/>"),
        &config(dir.path()),
    );

    capture
        .send(request("https://host/api/$metadata", "application/xml"))
        .await
        .unwrap();

    assert!(dir.path().join("host/api/metadata.xml").is_file());
}

#[tokio::test]
async fn captured_response_replays_without_live_service() {
    let dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let live = HandlerTransport::new(move |request| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            let body = format!("{{\"path\":\"{}\"}}", request.uri().path());
            Ok(http::Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "application/json")
                .body(http_body_util::Full::new(Bytes::from(body)))?)
        }
    });

    let capture = CaptureHandler::from_config(live, &config(dir.path()));
    let uri = "https://host/api/Teams?$top=5&$skip=10";
    let captured = capture
        .send(request(uri, "application/json"))
        .await
        .unwrap()
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes();

    let replay = ReplayHandler::from_config(&config(dir.path()));
    let replayed = replay.send(request(uri, "application/json")).await.unwrap();
    assert_eq!(replayed.status(), StatusCode::OK);
    assert_eq!(replayed.headers()[CONTENT_TYPE], "application/json");
    let body = replayed.into_body().collect().await.unwrap().to_bytes();

    assert_eq!(body, captured);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn replay_of_unrecorded_request_is_not_found() {
    let dir = TempDir::new().unwrap();
    let replay = ReplayHandler::from_config(&config(dir.path()));
    let err = replay
        .send(request("https://host/api/Players", "application/json"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn concurrent_captures_of_distinct_paths() {
    let dir = TempDir::new().unwrap();
    let capture = Arc::new(CaptureHandler::from_config(
        HandlerTransport::echo(),
        &config(dir.path()),
    ));

    let mut tasks = Vec::new();
    for index in 0..8 {
        let capture = Arc::clone(&capture);
        tasks.push(tokio::spawn(async move {
            capture
                .send(request(&format!("https://host/api/Item{index}"), "application/json"))
                .await
                .map(|_| ())
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    for index in 0..8 {
        let file = dir.path().join(format!("host/api/Item{index}/root.json"));
        let contents = std::fs::read_to_string(file).unwrap();
        assert!(contents.contains(&format!("/api/Item{index}")));
    }
}

#[tokio::test]
async fn overlong_path_is_truncated_or_rejected() {
    let dir = TempDir::new().unwrap();
    let long_query = format!("https://host/api/Teams?$filter={}", "a".repeat(400));

    let generous = PathCanonicalizer::new(dir.path()).with_max_path_length(4096);
    let limited = PathCanonicalizer::new(dir.path()).with_max_path_length(260);
    let uri = long_query.parse().unwrap();

    let full = generous.canonicalize(&uri, Some("application/json")).unwrap();
    let truncated = limited.canonicalize(&uri, Some("application/json")).unwrap();
    assert_eq!(limited.full_path(&truncated).to_string_lossy().chars().count(), 260);
    assert!(full.file_name().len() > truncated.file_name().len());
    assert!(truncated.file_name().ends_with(".json"));

    let tiny = PathCanonicalizer::new(dir.path()).with_max_path_length(10);
    let err = tiny.canonicalize(&uri, Some("application/json")).unwrap_err();
    assert!(matches!(err, SnapshotError::PathTooLong { .. }));
}
