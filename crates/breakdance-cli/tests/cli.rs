//! Command runs against metadata on disk.

use breakdance_cli::{run, Args, Command};
use breakdance_config::BreakdanceConfig;
use breakdance_surface::fixtures;
use tempfile::TempDir;

fn write_metadata(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(format!("{name}.surface.json"));
    std::fs::write(&path, fixtures::sample_assembly().to_json().unwrap()).unwrap();
    path
}

fn run_args(args: &[&str]) -> (bool, String) {
    let args = Args::parse_from(args.iter().copied()).unwrap();
    let mut output = Vec::new();
    let matched = run(&args.command, &BreakdanceConfig::default(), &mut output).unwrap();
    (matched, String::from_utf8(output).unwrap())
}

#[test]
fn generate_writes_one_baseline_per_metadata_file() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("net8.0")).unwrap();
    write_metadata(dir.path(), "Breakdance.Samples");
    write_metadata(&dir.path().join("net8.0"), "Breakdance.Other");
    std::fs::write(dir.path().join("Broken.surface.json"), "not json").unwrap();

    let (ok, printed) = run_args(&["generate", dir.path().to_str().unwrap()]);
    assert!(ok);
    assert!(printed.contains("2 baseline(s) written, 1 skipped"));

    let written = std::fs::read_to_string(dir.path().join("Breakdance.Samples.bsl")).unwrap();
    assert_eq!(written, fixtures::SAMPLE_REPORT);
    assert!(dir.path().join("net8.0/Breakdance.Other.bsl").is_file());
}

#[test]
fn generate_into_output_folder() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("baselines");
    write_metadata(dir.path(), "Breakdance.Samples");

    let (ok, _) = run_args(&[
        "generate",
        dir.path().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(ok);
    assert!(out.join("Breakdance.Samples.bsl").is_file());
}

#[test]
fn compare_result_reflects_changes() {
    let dir = TempDir::new().unwrap();
    let metadata = write_metadata(dir.path(), "Breakdance.Samples");
    let baseline = dir.path().join("Breakdance.Samples.bsl");
    std::fs::write(&baseline, fixtures::SAMPLE_REPORT).unwrap();

    let (ok, printed) = run_args(&[
        "compare",
        metadata.to_str().unwrap(),
        baseline.to_str().unwrap(),
    ]);
    assert!(ok);
    assert!(printed.contains("matches"));

    std::fs::write(&baseline, "public class Removed {\n}\n\n").unwrap();
    let (ok, printed) = run_args(&[
        "compare",
        metadata.to_str().unwrap(),
        baseline.to_str().unwrap(),
    ]);
    assert!(!ok);
    assert!(printed.contains("- public class Removed {"));
}

#[test]
fn snapshot_path_prints_canonical_file() {
    let (ok, printed) = run_args(&[
        "snapshot-path",
        "https://host/api/Teams?$expand=Players",
        "--accept",
        "application/json",
        "--root",
        "snapshots",
    ]);
    assert!(ok);
    let expected: std::path::PathBuf = ["snapshots", "host", "api", "Teams", "Players", "root.json"]
        .iter()
        .collect();
    assert_eq!(printed.trim_end(), expected.display().to_string());
}

#[test]
fn help_lists_commands() {
    let (ok, printed) = run_args(&["--help"]);
    assert!(ok);
    assert!(printed.contains("snapshot-path"));
    assert!(matches!(Args::parse_from(["version"]).unwrap().command, Command::Version));
}
