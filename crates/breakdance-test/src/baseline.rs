//! Public API baseline assertions.
//!
//! A test generates the surface report of an assembly and checks it against
//! the approved `.bsl` file. Set `BREAKDANCE_UPDATE_BASELINES=1` to rewrite
//! the baseline instead of failing after an intended change.

use std::path::Path;

use breakdance_surface::model::Assembly;
use breakdance_surface::{Baseline, BaselineComparison, PublicApi, SurfaceDiff, SurfaceError};
use tracing::info;

use crate::error::TestError;

/// Environment variable that switches baseline checks to rewriting.
pub const UPDATE_BASELINES_ENV: &str = "BREAKDANCE_UPDATE_BASELINES";

/// Result of a baseline check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineOutcome {
    /// The report equals the baseline.
    Matched,
    /// The baseline file was written with the current report.
    Updated,
    /// The report differs from the baseline.
    Mismatched(SurfaceDiff),
    /// No baseline exists yet.
    Missing,
}

/// Returns true when [`UPDATE_BASELINES_ENV`] is `1` or `true`.
#[must_use]
pub fn update_requested() -> bool {
    std::env::var(UPDATE_BASELINES_ENV)
        .map(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}

/// Compares `assembly`'s report with the baseline at `baseline_path`, or
/// rewrites the baseline when `update` is set.
///
/// # Errors
///
/// Returns report generation errors, and baseline I/O errors other than a
/// missing file.
pub fn verify_baseline(
    api: &PublicApi,
    assembly: &Assembly,
    baseline_path: &Path,
    update: bool,
) -> Result<BaselineOutcome, TestError> {
    let report = api.generate_report(assembly)?;

    if update {
        Baseline::write(baseline_path, &report)?;
        info!(path = %baseline_path.display(), "Baseline updated");
        return Ok(BaselineOutcome::Updated);
    }

    let baseline = match Baseline::load(baseline_path) {
        Ok(baseline) => baseline,
        Err(SurfaceError::BaselineRead { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            return Ok(BaselineOutcome::Missing);
        }
        Err(err) => return Err(err.into()),
    };

    Ok(match baseline.compare(&report) {
        BaselineComparison::Match => BaselineOutcome::Matched,
        BaselineComparison::Mismatch(diff) => BaselineOutcome::Mismatched(diff),
    })
}

/// Asserts that `assembly`'s public surface matches the baseline file.
///
/// # Panics
///
/// Panics with the line diff on a mismatch, when the baseline is missing,
/// or when the report cannot be produced.
#[track_caller]
pub fn assert_public_api_matches(assembly: &Assembly, baseline_path: impl AsRef<Path>) {
    assert_public_api_matches_with(&PublicApi::new(), assembly, baseline_path);
}

/// [`assert_public_api_matches`] with custom report settings.
///
/// # Panics
///
/// See [`assert_public_api_matches`].
#[track_caller]
pub fn assert_public_api_matches_with(
    api: &PublicApi,
    assembly: &Assembly,
    baseline_path: impl AsRef<Path>,
) {
    let path = baseline_path.as_ref();
    match verify_baseline(api, assembly, path, update_requested()) {
        Ok(BaselineOutcome::Matched | BaselineOutcome::Updated) => {}
        Ok(BaselineOutcome::Mismatched(diff)) => panic!(
            "Public API of '{}' differs from {}:\n{diff}\nRun with {UPDATE_BASELINES_ENV}=1 to accept the change.",
            assembly.name,
            path.display()
        ),
        Ok(BaselineOutcome::Missing) => panic!(
            "No baseline at {}. Run with {UPDATE_BASELINES_ENV}=1 to create it.",
            path.display()
        ),
        Err(e) => panic!("Public API check of '{}' failed: {e}", assembly.name),
    }
}
