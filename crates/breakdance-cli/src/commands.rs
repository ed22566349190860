//! Command implementations.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use breakdance_config::BreakdanceConfig;
use breakdance_snapshot::PathCanonicalizer;
use breakdance_surface::{baseline_path_for, Baseline, BaselineComparison, PublicApi};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Suffix of metadata files picked up by `generate`.
pub const METADATA_SUFFIX: &str = ".surface.json";

/// Outcome of a `generate` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Baselines written.
    pub written: Vec<PathBuf>,
    /// Metadata files that produced no report.
    pub failed: Vec<PathBuf>,
}

/// Metadata files under `dir`, sorted by path.
pub fn discover_metadata(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(METADATA_SUFFIX))
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Writes a baseline for every metadata file under `dir`.
///
/// Best effort: a file that cannot be reported is logged and skipped.
pub fn generate(api: &PublicApi, dir: &Path, out: Option<&Path>) -> GenerateSummary {
    let mut summary = GenerateSummary::default();

    for metadata in discover_metadata(dir) {
        let target = match (out, baseline_path_for(&metadata).file_name()) {
            (Some(out), Some(file_name)) => out.join(file_name),
            _ => baseline_path_for(&metadata),
        };

        let written = api
            .report_for_path(&metadata)
            .map_err(anyhow::Error::from)
            .and_then(|report| Ok(Baseline::write(&target, &report)?));
        match written {
            Ok(()) => {
                info!(metadata = %metadata.display(), baseline = %target.display(), "Baseline written");
                summary.written.push(target);
            }
            Err(e) => {
                warn!(metadata = %metadata.display(), error = %e, "No baseline written");
                summary.failed.push(metadata);
            }
        }
    }

    summary
}

/// Compares a metadata file's report with a baseline, writing the diff to
/// `output`. Returns true when they match.
pub fn compare(
    api: &PublicApi,
    metadata: &Path,
    baseline: &Path,
    output: &mut impl Write,
) -> Result<bool> {
    let report = api
        .report_for_path(metadata)
        .with_context(|| format!("failed to report {}", metadata.display()))?;
    let baseline = Baseline::load(baseline)
        .with_context(|| format!("failed to read baseline {}", baseline.display()))?;

    match baseline.compare(&report) {
        BaselineComparison::Match => {
            writeln!(output, "Public API matches baseline")?;
            Ok(true)
        }
        BaselineComparison::Mismatch(diff) => {
            writeln!(output, "Public API changed:")?;
            write!(output, "{diff}")?;
            Ok(false)
        }
    }
}

/// Full snapshot path of a request URL.
pub fn snapshot_path(
    config: &BreakdanceConfig,
    url: &str,
    accept: Option<&str>,
    root: Option<&Path>,
) -> Result<PathBuf> {
    let mut canonicalizer = PathCanonicalizer::from_config(&config.snapshot);
    if let Some(root) = root {
        canonicalizer = PathCanonicalizer::new(root)
            .with_max_path_length(canonicalizer.max_path_length());
    }

    let uri: http::Uri = url
        .parse()
        .with_context(|| format!("invalid URL '{url}'"))?;
    let path = canonicalizer.canonicalize(&uri, accept)?;
    Ok(canonicalizer.full_path(&path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use breakdance_surface::fixtures;
    use std::sync::Arc;
    use breakdance_surface::AssemblyLoader;
    use tempfile::TempDir;

    fn api() -> PublicApi {
        PublicApi::new().with_loader(Arc::new(AssemblyLoader::new()))
    }

    #[test]
    fn test_discover_only_metadata_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.surface.json"), "{}").unwrap();
        std::fs::write(dir.path().join("nested/a.surface.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let found = discover_metadata(dir.path());
        assert_eq!(
            found,
            vec![
                dir.path().join("b.surface.json"),
                dir.path().join("nested/a.surface.json"),
            ]
        );
    }

    #[test]
    fn test_snapshot_path_with_root_override() {
        let config = BreakdanceConfig::default();
        let path = snapshot_path(
            &config,
            "https://host/api/$metadata",
            Some("application/xml"),
            Some(Path::new("recorded")),
        )
        .unwrap();
        assert_eq!(path, Path::new("recorded/host/api/metadata.xml"));
    }

    #[test]
    fn test_snapshot_path_rejects_relative_url() {
        let err = snapshot_path(&BreakdanceConfig::default(), "/api", None, None).unwrap_err();
        assert!(err.to_string().contains("no host"));
    }

    #[test]
    fn test_compare_prints_diff() {
        let dir = TempDir::new().unwrap();
        let metadata = dir.path().join("Sample.surface.json");
        std::fs::write(&metadata, fixtures::sample_assembly().to_json().unwrap()).unwrap();
        let baseline = dir.path().join("Sample.bsl");
        std::fs::write(&baseline, fixtures::SAMPLE_REPORT).unwrap();

        let mut output = Vec::new();
        assert!(compare(&api(), &metadata, &baseline, &mut output).unwrap());

        std::fs::write(&baseline, fixtures::SAMPLE_REPORT.replace("Filter(int)", "Filter(long)")).unwrap();
        let mut output = Vec::new();
        assert!(!compare(&api(), &metadata, &baseline, &mut output).unwrap());
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("- \tpublic void Filter(long)"));
        assert!(printed.contains("+ \tpublic void Filter(int)"));
    }
}
