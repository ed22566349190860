//! Assembly metadata loading with a per-path cache.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::{SurfaceError, SurfaceResult};
use crate::model::Assembly;

static GLOBAL: OnceLock<AssemblyLoader> = OnceLock::new();

/// Loads `*.surface.json` metadata and caches it by canonical path.
///
/// Loading the same file twice returns the same [`Arc`]. The loader is safe
/// to share across threads.
#[derive(Debug, Default)]
pub struct AssemblyLoader {
    cache: DashMap<PathBuf, Arc<Assembly>>,
}

impl AssemblyLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide loader.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Loads the metadata file at `path`, or returns the cached copy.
    ///
    /// # Errors
    ///
    /// - `SurfaceError::AssemblyNotFound` when no file exists at `path`
    /// - `SurfaceError::AssemblyRead` when the file cannot be read
    /// - `SurfaceError::AssemblyParse` when it is not valid metadata
    pub fn load(&self, path: impl AsRef<Path>) -> SurfaceResult<Arc<Assembly>> {
        let path = path.as_ref();
        let canonical = fs::canonicalize(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SurfaceError::AssemblyNotFound {
                path: path.to_path_buf(),
            },
            _ => SurfaceError::AssemblyRead {
                path: path.to_path_buf(),
                source,
            },
        })?;

        if let Some(cached) = self.cache.get(&canonical) {
            return Ok(Arc::clone(cached.value()));
        }

        let content = fs::read_to_string(&canonical).map_err(|source| SurfaceError::AssemblyRead {
            path: path.to_path_buf(),
            source,
        })?;
        let assembly = Assembly::from_json(&content).map_err(|source| {
            warn!(path = %path.display(), error = %source, "Invalid assembly metadata");
            SurfaceError::AssemblyParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(
            path = %canonical.display(),
            assembly = %assembly.name,
            types = assembly.types.len(),
            "Assembly metadata loaded"
        );

        // A concurrent load of the same path may have won; keep its instance.
        let entry = self
            .cache
            .entry(canonical)
            .or_insert_with(|| Arc::new(assembly));
        Ok(Arc::clone(entry.value()))
    }

    /// Returns true if `path` has been loaded.
    #[must_use]
    pub fn is_loaded(&self, path: impl AsRef<Path>) -> bool {
        fs::canonicalize(path).is_ok_and(|canonical| self.cache.contains_key(&canonical))
    }

    /// Number of cached assemblies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drops every cached assembly.
    pub fn clear(&self) {
        self.cache.clear();
    }
}
