//! Stored baselines and line-level comparison against them.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use similar::{ChangeTag, TextDiff};
use tracing::debug;

use crate::error::{SurfaceError, SurfaceResult};

/// A previously approved report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    content: String,
}

impl Baseline {
    /// Wraps report text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Reads a baseline file.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::BaselineRead` if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> SurfaceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SurfaceError::BaselineRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(content))
    }

    /// Writes `report` as the new baseline, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::BaselineWrite` on I/O failure.
    pub fn write(path: impl AsRef<Path>, report: &str) -> SurfaceResult<()> {
        let path = path.as_ref();
        let to_error = |source: io::Error| SurfaceError::BaselineWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        fs::write(path, report).map_err(to_error)?;
        debug!(path = %path.display(), "Baseline written");
        Ok(())
    }

    /// Baseline text as stored.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Compares `actual` to this baseline after normalizing line endings.
    #[must_use]
    pub fn compare(&self, actual: &str) -> BaselineComparison {
        let expected = normalize_line_endings(&self.content);
        let actual = normalize_line_endings(actual);
        if expected == actual {
            return BaselineComparison::Match;
        }
        BaselineComparison::Mismatch(SurfaceDiff::between(&expected, &actual))
    }
}

/// Result of comparing a report to its baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineComparison {
    /// Identical after line ending normalization.
    Match,
    /// The surface changed.
    Mismatch(SurfaceDiff),
}

impl BaselineComparison {
    /// Returns true for [`BaselineComparison::Match`].
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    /// The diff, if the report changed.
    #[must_use]
    pub const fn diff(&self) -> Option<&SurfaceDiff> {
        match self {
            Self::Match => None,
            Self::Mismatch(diff) => Some(diff),
        }
    }
}

/// One line of a [`SurfaceDiff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Present in both.
    Same(String),
    /// Only in the baseline.
    Removed(String),
    /// Only in the new report.
    Added(String),
}

/// Line diff from a baseline to a new report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDiff {
    lines: Vec<DiffLine>,
}

impl SurfaceDiff {
    /// Diffs two reports line by line.
    #[must_use]
    pub fn between(expected: &str, actual: &str) -> Self {
        let diff = TextDiff::from_lines(expected, actual);
        let lines = diff
            .iter_all_changes()
            .map(|change| {
                let text = change.value().trim_end_matches('\n').to_string();
                match change.tag() {
                    ChangeTag::Equal => DiffLine::Same(text),
                    ChangeTag::Delete => DiffLine::Removed(text),
                    ChangeTag::Insert => DiffLine::Added(text),
                }
            })
            .collect();
        Self { lines }
    }

    /// Every line, in order.
    #[must_use]
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Lines only in the new report.
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            DiffLine::Added(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Lines only in the baseline.
    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            DiffLine::Removed(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns true when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines
            .iter()
            .all(|line| matches!(line, DiffLine::Same(_)))
    }
}

impl fmt::Display for SurfaceDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                DiffLine::Same(text) => writeln!(f, "  {text}")?,
                DiffLine::Removed(text) => writeln!(f, "- {text}")?,
                DiffLine::Added(text) => writeln!(f, "+ {text}")?,
            }
        }
        Ok(())
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Conventional baseline file for a metadata file: `<stem>.bsl` beside it.
///
/// `Sample.surface.json` maps to `Sample.bsl`.
#[must_use]
pub fn baseline_path_for(metadata: &Path) -> PathBuf {
    let file_name = metadata
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(".surface.json")
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name);
    metadata.with_file_name(format!("{stem}.bsl"))
}
