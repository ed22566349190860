//! Test error types.

use breakdance_snapshot::SnapshotError;
use breakdance_surface::SurfaceError;
use thiserror::Error;

/// Errors that can occur while driving a test client or checking a baseline.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be built.
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// A header name or value is invalid.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The response body could not be read.
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The transport, capture or replay failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Report generation or baseline I/O failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl TestError {
    /// Returns true if a replayed request had no snapshot.
    #[must_use]
    pub fn is_snapshot_missing(&self) -> bool {
        matches!(self, Self::Snapshot(err) if err.is_not_found())
    }
}
