//! Retried snapshot file I/O.
//!
//! Parallel tests often capture the same request at the same moment, so a
//! write can fail because another writer holds the file. Failed operations
//! are retried with exponential backoff; a missing file is never retried.

use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

use breakdance_config::SnapshotConfig;
use breakdance_telemetry::metrics::record_write_retry;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{SnapshotError, SnapshotResult};

/// Backoff settings for snapshot file I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. At least one attempt is always made.
    #[must_use]
    pub fn new(attempts: u32, initial_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            initial_delay,
        }
    }

    /// Creates a policy from the snapshot configuration section.
    #[must_use]
    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(config.retry_attempts, config.retry_initial_delay())
    }

    /// Total attempts, including the first.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay after the first failure.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Delay after the given failed attempt (zero based); doubles each time.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Runs `op` until it succeeds, fails with `NotFound`, runs out of
/// attempts, or `cancel` fires.
///
/// # Errors
///
/// - `SnapshotError::Cancelled` when the token fires first
/// - `SnapshotError::Io` with the last error otherwise
pub async fn retry_io<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    path: &Path,
    mut op: F,
) -> SnapshotResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    let mut attempt = 0;
    loop {
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SnapshotError::Cancelled),
            result = op() => result,
        };

        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        attempt += 1;
        if err.kind() == io::ErrorKind::NotFound || attempt >= policy.attempts {
            return Err(SnapshotError::Io {
                path: path.to_path_buf(),
                source: err,
            });
        }

        let delay = policy.delay_for(attempt - 1);
        warn!(
            path = %path.display(),
            attempt,
            ?delay,
            error = %err,
            "Snapshot I/O failed, retrying"
        );
        record_write_retry();

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SnapshotError::Cancelled),
            () = tokio::time::sleep(delay) => {}
        }
    }
}

/// Writes `contents` to `path`, creating parent directories first.
///
/// # Errors
///
/// See [`retry_io`].
pub async fn write_with_retry(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    path: &Path,
    contents: Bytes,
) -> SnapshotResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| SnapshotError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    retry_io(policy, cancel, path, || tokio::fs::write(path, contents.clone())).await?;
    debug!(path = %path.display(), bytes = contents.len(), "Snapshot written");
    Ok(())
}

/// Reads the file at `path`.
///
/// # Errors
///
/// Returns `SnapshotError::SnapshotNotFound` when the file does not exist,
/// otherwise see [`retry_io`].
pub async fn read_snapshot(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    path: &Path,
) -> SnapshotResult<Bytes> {
    match retry_io(policy, cancel, path, || tokio::fs::read(path)).await {
        Ok(contents) => Ok(Bytes::from(contents)),
        Err(SnapshotError::Io { path, source }) if source.kind() == io::ErrorKind::NotFound => {
            Err(SnapshotError::SnapshotNotFound { path })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    fn fast(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(1))
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 5);
        assert_eq!(policy.delay_for(0), Duration::from_millis(50));
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = SnapshotConfig {
            retry_attempts: 3,
            retry_initial_delay_ms: 10,
            ..SnapshotConfig::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.initial_delay(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let calls = AtomicU32::new(0);
        let result = retry_io(&fast(5), &CancellationToken::new(), Path::new("x"), || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call < 2 {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
                } else {
                    Ok(call)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(result, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_attempts_are_bounded() {
        let calls = AtomicU32::new(0);
        let err = retry_io::<(), _, _>(&fast(3), &CancellationToken::new(), Path::new("x"), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked")) }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_retried() {
        let dir = TempDir::new().unwrap();
        let err = read_snapshot(&fast(5), &CancellationToken::new(), &dir.path().join("none.json"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let dir = TempDir::new().unwrap();
        let err = write_with_retry(&fast(5), &cancel, &dir.path().join("a.txt"), Bytes::from("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_during_backoff() {
        let cancel = CancellationToken::new();
        let policy = RetryPolicy::new(5, Duration::from_secs(60));
        let trigger = cancel.clone();
        let err = retry_io::<(), _, _>(&policy, &cancel, Path::new("x"), || {
            trigger.cancel();
            async { Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked")) }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SnapshotError::Cancelled));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("host").join("api").join("root.json");
        let cancel = CancellationToken::new();

        write_with_retry(&fast(2), &cancel, &path, Bytes::from_static(b"{\"a\":1}"))
            .await
            .unwrap();
        let contents = read_snapshot(&fast(2), &cancel, &path).await.unwrap();
        assert_eq!(contents, Bytes::from_static(b"{\"a\":1}"));
    }
}
