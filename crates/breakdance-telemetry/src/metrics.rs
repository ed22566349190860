//! Counters emitted by Breakdance.
//!
//! Counters go through the [`metrics`] facade; without an installed recorder
//! they are no-ops, so test suites pay nothing unless they opt in.
//!
//! | Metric | Labels | Description |
//! |--------|--------|-------------|
//! | `breakdance_snapshots_captured_total` | `host` | Response bodies written to disk |
//! | `breakdance_snapshots_replayed_total` | `host` | Responses served from disk |
//! | `breakdance_snapshot_misses_total` | `host` | Replays with no recorded file |
//! | `breakdance_snapshot_write_retries_total` | - | Failed write attempts that were retried |
//! | `breakdance_surface_reports_total` | `assembly` | Public API reports generated |

use metrics::{counter, describe_counter};
use std::sync::Once;

static DESCRIBE: Once = Once::new();

/// Registers metric descriptions with the installed recorder.
///
/// Safe to call repeatedly; descriptions are registered once.
pub fn describe_metrics() {
    DESCRIBE.call_once(|| {
        describe_counter!(
            "breakdance_snapshots_captured_total",
            "Response bodies captured to the snapshot tree"
        );
        describe_counter!(
            "breakdance_snapshots_replayed_total",
            "Responses replayed from the snapshot tree"
        );
        describe_counter!(
            "breakdance_snapshot_misses_total",
            "Replay requests with no recorded snapshot"
        );
        describe_counter!(
            "breakdance_snapshot_write_retries_total",
            "Snapshot writes retried after an I/O error"
        );
        describe_counter!(
            "breakdance_surface_reports_total",
            "Public API surface reports generated"
        );
    });
}

/// Records a captured snapshot.
pub fn record_snapshot_captured(host: &str) {
    counter!("breakdance_snapshots_captured_total", "host" => host.to_string()).increment(1);
}

/// Records a replayed snapshot.
pub fn record_snapshot_replayed(host: &str) {
    counter!("breakdance_snapshots_replayed_total", "host" => host.to_string()).increment(1);
}

/// Records a replay that found no snapshot.
pub fn record_snapshot_miss(host: &str) {
    counter!("breakdance_snapshot_misses_total", "host" => host.to_string()).increment(1);
}

/// Records a retried snapshot write.
pub fn record_write_retry() {
    counter!("breakdance_snapshot_write_retries_total").increment(1);
}

/// Records a generated surface report.
pub fn record_surface_report(assembly: &str) {
    counter!("breakdance_surface_reports_total", "assembly" => assembly.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        describe_metrics();
        describe_metrics();
        record_snapshot_captured("localhost");
        record_snapshot_replayed("localhost");
        record_snapshot_miss("localhost");
        record_write_retry();
        record_surface_report("Sample.Assembly");
    }
}
