//! Serving recorded responses instead of a live service.

use breakdance_config::SnapshotConfig;
use breakdance_telemetry::metrics::{record_snapshot_miss, record_snapshot_replayed};
use http::header::CONTENT_TYPE;
use http::{Response, StatusCode};
use http_body_util::Full;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::error::{SnapshotError, SnapshotResult};
use crate::mime::media_type_for_extension;
use crate::path::{PathCanonicalizer, SnapshotPath};
use crate::retry::{read_snapshot, RetryPolicy};
use crate::transport::{BoxFuture, Transport, TransportRequest, TransportResponse};

/// Answers requests from snapshot files.
///
/// Every hit is a `200 OK` carrying the file contents and a content type
/// derived from the file extension. Nothing is sent over the network.
#[derive(Debug, Clone)]
pub struct ReplayHandler {
    canonicalizer: PathCanonicalizer,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl ReplayHandler {
    /// Replays snapshots under `canonicalizer`'s root.
    #[must_use]
    pub fn new(canonicalizer: PathCanonicalizer) -> Self {
        Self {
            canonicalizer,
            policy: RetryPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a handler from the snapshot configuration section.
    #[must_use]
    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(PathCanonicalizer::from_config(config))
            .with_retry_policy(RetryPolicy::from_config(config))
    }

    /// Sets the read retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Aborts pending reads when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The path canonicalizer in use.
    pub const fn canonicalizer(&self) -> &PathCanonicalizer {
        &self.canonicalizer
    }

    /// Answers `request` from its snapshot file.
    ///
    /// # Errors
    ///
    /// - `SnapshotError::InvalidRequest` or `PathTooLong` for unmappable requests
    /// - `SnapshotError::SnapshotNotFound` when nothing was captured
    /// - `SnapshotError::Io` or `Cancelled` when the read fails
    #[instrument(skip_all, fields(uri = %request.uri()))]
    pub async fn replay(&self, request: TransportRequest) -> SnapshotResult<TransportResponse> {
        let snapshot = self.canonicalizer.canonicalize_request(&request)?;
        let path = self.canonicalizer.full_path(&snapshot);

        let body = match read_snapshot(&self.policy, &self.cancel, &path).await {
            Ok(body) => body,
            Err(err @ SnapshotError::SnapshotNotFound { .. }) => {
                record_snapshot_miss(snapshot.host());
                warn!(path = %path.display(), "No snapshot recorded for request");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        record_snapshot_replayed(snapshot.host());
        debug!(path = %path.display(), bytes = body.len(), "Snapshot replayed");

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, media_type_for_extension(snapshot.extension()))
            .body(Full::new(body))?)
    }

    /// Snapshot path a request would be replayed from.
    ///
    /// # Errors
    ///
    /// See [`PathCanonicalizer::canonicalize`].
    pub fn snapshot_path(&self, request: &TransportRequest) -> SnapshotResult<SnapshotPath> {
        self.canonicalizer.canonicalize_request(request)
    }
}

impl Transport for ReplayHandler {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, SnapshotResult<TransportResponse>> {
        Box::pin(self.replay(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{header::ACCEPT, Request};
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_replay_serves_file_with_content_type() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("host/api/metadata.xml");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "<edmx/>").unwrap();

        let handler = ReplayHandler::new(PathCanonicalizer::new(dir.path()));
        let request = Request::get("https://host/api/$metadata")
            .header(ACCEPT, "application/xml")
            .body(Bytes::new())
            .unwrap();

        let response = handler.replay(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/xml");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("<edmx/>"));
    }

    #[tokio::test]
    async fn test_missing_snapshot() {
        let dir = TempDir::new().unwrap();
        let handler = ReplayHandler::new(PathCanonicalizer::new(dir.path()));
        let request = Request::get("https://host/api/Teams").body(Bytes::new()).unwrap();

        match handler.replay(request).await.unwrap_err() {
            SnapshotError::SnapshotNotFound { path } => {
                assert_eq!(path, dir.path().join("host/api/Teams/root.txt"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_replay() {
        let dir = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let handler = ReplayHandler::new(PathCanonicalizer::new(dir.path())).with_cancellation(cancel);
        let request = Request::get("https://host/api").body(Bytes::new()).unwrap();

        let err = handler.replay(request).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Cancelled));
    }
}
