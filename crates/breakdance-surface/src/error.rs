//! Error types for surface reports.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`SurfaceError`].
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors raised while loading metadata, building or comparing reports.
///
/// Resolution failures (`AssemblyNotFound`, `TypeNotFound`) are distinct
/// from an empty report, which is a valid result.
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// No metadata file exists at the given path.
    #[error("assembly not found: {}", .path.display())]
    AssemblyNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The metadata file exists but could not be read.
    #[error("failed to read assembly metadata: {}", .path.display())]
    AssemblyRead {
        /// Path of the metadata file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The metadata file is not a valid assembly description.
    #[error("invalid assembly metadata in {}: {source}", .path.display())]
    AssemblyParse {
        /// Path of the metadata file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A type name could not be resolved inside an assembly.
    #[error("type not found: {type_name}")]
    TypeNotFound {
        /// Full name that was requested.
        type_name: String,
    },

    /// Two members of one type produced identical ordering keys.
    #[error("ambiguous member order in {type_name}: {member} appears more than once")]
    AmbiguousMemberOrder {
        /// Full name of the declaring type.
        type_name: String,
        /// The duplicated member signature.
        member: String,
    },

    /// Two types produced identical ordering keys.
    #[error("ambiguous type order: {type_name} appears more than once")]
    AmbiguousTypeOrder {
        /// The duplicated full name.
        type_name: String,
    },

    /// A baseline file could not be read.
    #[error("failed to read baseline: {}", .path.display())]
    BaselineRead {
        /// Path of the baseline.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A baseline file could not be written.
    #[error("failed to write baseline: {}", .path.display())]
    BaselineWrite {
        /// Path of the baseline.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl SurfaceError {
    /// Returns true when the error means the target could not be resolved,
    /// as opposed to a structural problem with the metadata.
    #[must_use]
    pub const fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::AssemblyNotFound { .. } | Self::TypeNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = SurfaceError::AssemblyNotFound {
            path: PathBuf::from("missing.surface.json"),
        };
        assert_eq!(err.to_string(), "assembly not found: missing.surface.json");
        assert!(err.is_resolution_failure());
    }

    #[test]
    fn test_ambiguous_member_display() {
        let err = SurfaceError::AmbiguousMemberOrder {
            type_name: "Sample.Widget".to_string(),
            member: "Render(int)".to_string(),
        };
        assert!(err.to_string().contains("Sample.Widget"));
        assert!(err.to_string().contains("Render(int)"));
        assert!(!err.is_resolution_failure());
    }
}
