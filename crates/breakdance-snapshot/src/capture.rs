//! Recording responses from a live transport.

use breakdance_config::SnapshotConfig;
use breakdance_telemetry::metrics::record_snapshot_captured;
use http_body_util::{BodyExt, Full};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::error::SnapshotResult;
use crate::path::{PathCanonicalizer, SnapshotPath};
use crate::retry::{write_with_retry, RetryPolicy};
use crate::transport::{BoxFuture, Transport, TransportRequest, TransportResponse};

/// Forwards requests to an inner transport and writes every response body
/// to its snapshot file.
///
/// The response handed back to the caller is the inner transport's,
/// unchanged.
#[derive(Debug, Clone)]
pub struct CaptureHandler<T> {
    inner: T,
    canonicalizer: PathCanonicalizer,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl<T: Transport> CaptureHandler<T> {
    /// Captures responses from `inner` into snapshots under `canonicalizer`'s root.
    pub fn new(inner: T, canonicalizer: PathCanonicalizer) -> Self {
        Self {
            inner,
            canonicalizer,
            policy: RetryPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a handler from the snapshot configuration section.
    pub fn from_config(inner: T, config: &SnapshotConfig) -> Self {
        Self::new(inner, PathCanonicalizer::from_config(config))
            .with_retry_policy(RetryPolicy::from_config(config))
    }

    /// Sets the write retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Aborts pending writes when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The path canonicalizer in use.
    pub const fn canonicalizer(&self) -> &PathCanonicalizer {
        &self.canonicalizer
    }

    /// The wrapped transport.
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    /// Forwards `request` and records the response.
    ///
    /// # Errors
    ///
    /// - `SnapshotError::InvalidRequest` or `PathTooLong` before anything is sent
    /// - any error of the inner transport
    /// - `SnapshotError::Io` or `Cancelled` when the write fails
    #[instrument(skip_all, fields(uri = %request.uri()))]
    pub async fn capture(&self, request: TransportRequest) -> SnapshotResult<TransportResponse> {
        let snapshot = self.canonicalizer.canonicalize_request(&request)?;
        let response = self.inner.send(request).await?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .unwrap_or_else(|never| match never {})
            .to_bytes();

        let path = self.canonicalizer.full_path(&snapshot);
        write_with_retry(&self.policy, &self.cancel, &path, body.clone()).await?;
        record_snapshot_captured(snapshot.host());
        info!(
            path = %path.display(),
            status = parts.status.as_u16(),
            bytes = body.len(),
            "Snapshot captured"
        );

        Ok(TransportResponse::from_parts(parts, Full::new(body)))
    }

    /// Snapshot path a request would be captured to.
    ///
    /// # Errors
    ///
    /// See [`PathCanonicalizer::canonicalize`].
    pub fn snapshot_path(&self, request: &TransportRequest) -> SnapshotResult<SnapshotPath> {
        self.canonicalizer.canonicalize_request(request)
    }
}

impl<T: Transport> Transport for CaptureHandler<T> {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, SnapshotResult<TransportResponse>> {
        Box::pin(self.capture(request))
    }
}
