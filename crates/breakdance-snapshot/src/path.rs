//! Deterministic snapshot file paths for HTTP requests.
//!
//! A request URI and its Accept header map to a directory under the
//! snapshot root and a file name. The mapping is a pure function: the same
//! inputs always produce the same path, so a captured response can be found
//! again on replay.
//!
//! # Rules
//!
//! Checked in order, first match wins:
//!
//! 1. No host: the request is rejected.
//! 2. No path segments: `host/root.<ext>`.
//! 3. A query string: the directory is `host/<segments>`, each `$expand`
//!    level adds one more directory, and the rest of the query becomes the
//!    file name. Parameters are decoded one at a time, so an encoded `&`
//!    never splits a clause.
//! 4. A last segment starting with `$` (`$metadata`, `$count`): that segment
//!    is the file name, the segments before it the directory.
//! 5. Otherwise: the whole path is the directory and the file is `root.<ext>`.
//!
//! Grouping characters `( ) , $` are removed everywhere. When the absolute
//! path exceeds the configured limit, the file stem is shortened by exactly
//! the overflow.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use breakdance_config::SnapshotConfig;
use http::header::ACCEPT;
use http::{Request, Uri};
use regex::Regex;

use crate::error::{SnapshotError, SnapshotResult};
use crate::mime::extension_for_accept;

/// File stem used when nothing else names the file.
pub const ROOT_STEM: &str = "root";

/// Default limit on the full snapshot path, in characters.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 260;

/// Characters that cannot appear in a file name.
const INVALID_FILE_CHARS: &[char] = &['/', '?', '&', ':', '\\', '*', '"', '<', '>', '|'];

/// Characters removed from every path component.
const GROUPING_CHARS: &[char] = &['(', ')', ',', '$'];

fn expand_regex() -> &'static Regex {
    static EXPAND: OnceLock<Regex> = OnceLock::new();
    EXPAND.get_or_init(|| Regex::new(r"(?i)^\$expand=").expect("valid regex"))
}

/// Location of one snapshot, relative to the snapshot root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotPath {
    directory: PathBuf,
    file_name: String,
}

impl SnapshotPath {
    /// Directory relative to the root; its first component is the host.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name including the extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Extension without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map_or("", |(_, extension)| extension)
    }

    /// `directory/file_name`.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Host the snapshot belongs to.
    #[must_use]
    pub fn host(&self) -> &str {
        self.directory
            .iter()
            .next()
            .and_then(|host| host.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for SnapshotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path().display())
    }
}

/// Maps requests to [`SnapshotPath`]s under a root folder.
#[derive(Debug, Clone)]
pub struct PathCanonicalizer {
    root: PathBuf,
    absolute_root: PathBuf,
    max_path_length: usize,
}

impl PathCanonicalizer {
    /// Creates a canonicalizer for snapshots under `root`.
    ///
    /// A relative root is resolved against the current directory once, here,
    /// for the length check.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let absolute_root = if root.is_absolute() {
            root.clone()
        } else {
            std::env::current_dir().map_or_else(|_| root.clone(), |cwd| cwd.join(&root))
        };
        Self {
            root,
            absolute_root,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
        }
    }

    /// Creates a canonicalizer from the snapshot configuration section.
    #[must_use]
    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(config.root.clone()).with_max_path_length(config.max_path_length)
    }

    /// Sets the path length limit.
    #[must_use]
    pub fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    /// Snapshot root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root the path length is measured from.
    #[must_use]
    pub fn absolute_root(&self) -> &Path {
        &self.absolute_root
    }

    /// Path length limit.
    #[must_use]
    pub const fn max_path_length(&self) -> usize {
        self.max_path_length
    }

    /// Full path of a snapshot: `root/directory/file_name`.
    #[must_use]
    pub fn full_path(&self, path: &SnapshotPath) -> PathBuf {
        self.root.join(path.relative_path())
    }

    /// Snapshot path for a request, using its `Accept` header.
    ///
    /// # Errors
    ///
    /// See [`canonicalize`](Self::canonicalize).
    pub fn canonicalize_request<B>(&self, request: &Request<B>) -> SnapshotResult<SnapshotPath> {
        let accept = request
            .headers()
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok());
        self.canonicalize(request.uri(), accept)
    }

    /// Snapshot path for a request URI and Accept header.
    ///
    /// # Errors
    ///
    /// - `SnapshotError::InvalidRequest` if the URI has no host
    /// - `SnapshotError::PathTooLong` if the path cannot be shortened to fit
    pub fn canonicalize(&self, uri: &Uri, accept: Option<&str>) -> SnapshotResult<SnapshotPath> {
        let host = uri.host().filter(|host| !host.is_empty()).ok_or_else(|| {
            SnapshotError::invalid_request("request_uri", format!("'{uri}' has no host"))
        })?;

        let segments: Vec<String> = uri
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| sanitize(&decode(segment)))
            .collect();
        let query = uri.query().filter(|query| !query.is_empty());

        let mut directory = vec![host.to_string()];
        let stem = match (segments.split_last(), query) {
            (None, _) => ROOT_STEM.to_string(),
            (Some(_), Some(query)) => {
                directory.extend(segments.iter().cloned());
                let mut remaining = String::new();
                for parameter in query.split('&').map(decode_query_parameter) {
                    if expand_regex().is_match(&parameter) {
                        directory.extend(expand_levels(&parameter));
                    } else {
                        remaining.push_str(&parameter);
                    }
                }
                sanitize(&remaining)
            }
            (Some((last, rest)), None) if last.starts_with('$') => {
                directory.extend(rest.iter().cloned());
                last.clone()
            }
            (Some(_), None) => {
                directory.extend(segments.iter().cloned());
                ROOT_STEM.to_string()
            }
        };

        let directory: PathBuf = directory
            .iter()
            .map(|component| strip_grouping(component))
            .filter(|component| !component.is_empty() && component != "." && component != "..")
            .collect();
        let stem = match strip_grouping(&stem) {
            stem if stem.is_empty() => ROOT_STEM.to_string(),
            stem => stem,
        };

        self.fit(directory, &stem, extension_for_accept(accept))
    }

    /// Shortens the stem so the absolute path fits within the limit.
    ///
    /// The stem keeps at least one character: an overflow equal to or
    /// larger than the stem length fails with `PathTooLong`.
    fn fit(&self, directory: PathBuf, stem: &str, extension: &str) -> SnapshotResult<SnapshotPath> {
        let file_name = format!("{stem}.{extension}");
        let full = self.absolute_root.join(&directory).join(&file_name);
        let length = full.to_string_lossy().chars().count();
        if length <= self.max_path_length {
            return Ok(SnapshotPath {
                directory,
                file_name,
            });
        }

        let overflow = length - self.max_path_length;
        let stem_length = stem.chars().count();
        if overflow >= stem_length {
            return Err(SnapshotError::PathTooLong {
                path: full,
                limit: self.max_path_length,
                overflow,
            });
        }

        let truncated: String = stem.chars().take(stem_length - overflow).collect();
        Ok(SnapshotPath {
            directory,
            file_name: format!("{truncated}.{extension}"),
        })
    }
}

/// Directory levels named by an `$expand=` clause.
///
/// `$expand=Players($expand=Stats)` yields `Players(` and `Stats)`; the
/// grouping characters go later with the rest.
fn expand_levels(clause: &str) -> impl Iterator<Item = String> + '_ {
    clause
        .split('$')
        .filter(|part| !part.is_empty())
        .map(|part| match part.get(..7) {
            Some(prefix) if prefix.eq_ignore_ascii_case("expand=") => &part[7..],
            _ => part,
        })
        .map(sanitize)
        .filter(|level| !level.is_empty())
}

fn decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// One `name=value` pair of a query string, with `+` read as a space.
fn decode_query_parameter(raw: &str) -> String {
    decode(&raw.replace('+', " ")).into_owned()
}

/// Removes characters a file name cannot hold and turns spaces into `_`.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !INVALID_FILE_CHARS.contains(ch))
        .map(|ch| if ch == ' ' { '_' } else { ch })
        .collect()
}

fn strip_grouping(value: &str) -> String {
    value.chars().filter(|ch| !GROUPING_CHARS.contains(ch)).collect()
}
