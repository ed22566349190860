//! Error types for snapshot capture and replay.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`SnapshotError`].
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The request cannot be mapped to a snapshot path.
    #[error("Invalid request: {param}: {reason}")]
    InvalidRequest {
        /// Offending parameter.
        param: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The snapshot path cannot be shortened enough to fit the limit.
    #[error("Snapshot path too long ({overflow} characters over the {limit} limit): {}", .path.display())]
    PathTooLong {
        /// Path before truncation.
        path: PathBuf,
        /// Configured limit.
        limit: usize,
        /// Characters over the limit.
        overflow: usize,
    },

    /// No snapshot file exists for a replayed request.
    #[error("No snapshot found at {}", .path.display())]
    SnapshotNotFound {
        /// Computed snapshot path.
        path: PathBuf,
    },

    /// File I/O failed after every retry.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Last underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The inner transport failed.
    #[error("Transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The operation was cancelled.
    #[error("Snapshot operation cancelled")]
    Cancelled,

    /// A response could not be built.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl SnapshotError {
    /// Create an invalid request error.
    pub fn invalid_request(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            param,
            reason: reason.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns true if replay found nothing to return.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SnapshotNotFound { .. })
    }

    /// Error category for logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::PathTooLong { .. } => "path_too_long",
            Self::SnapshotNotFound { .. } => "not_found",
            Self::Io { .. } => "io",
            Self::Transport { .. } => "transport",
            Self::Cancelled => "cancelled",
            Self::InvalidResponse { .. } => "invalid_response",
        }
    }
}

impl From<http::Error> for SnapshotError {
    fn from(err: http::Error) -> Self {
        Self::invalid_response(err.to_string())
    }
}

impl From<reqwest::Error> for SnapshotError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}
