//! Entry point for generating and checking public API surface reports.

use std::path::Path;
use std::sync::Arc;

use breakdance_config::SurfaceConfig;
use breakdance_telemetry::metrics::record_surface_report;
use tracing::{info, instrument, warn};

use crate::baseline::{Baseline, BaselineComparison};
use crate::definition::TypeDefinition;
use crate::error::{SurfaceError, SurfaceResult};
use crate::loader::AssemblyLoader;
use crate::model::{Assembly, TypeInfo};
use crate::report::ReportRenderer;
use crate::walker::SurfaceWalker;

/// Generates deterministic reports of everything an assembly exposes.
///
/// # Example
///
/// ```
/// use breakdance_surface::{fixtures, PublicApi};
///
/// let report = PublicApi::new()
///     .generate_report(&fixtures::sample_assembly())
///     .unwrap();
/// assert!(report.contains("public static class Breakdance.Samples.SomeStaticClass {"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PublicApi {
    walker: SurfaceWalker,
    loader: Option<Arc<AssemblyLoader>>,
}

impl PublicApi {
    /// Creates a facade with default settings and the global loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a facade from the surface configuration section.
    #[must_use]
    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self {
            walker: SurfaceWalker::from_config(config),
            loader: None,
        }
    }

    /// Uses a private loader instead of [`AssemblyLoader::global`].
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<AssemblyLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// The walker in use.
    #[must_use]
    pub const fn walker(&self) -> &SurfaceWalker {
        &self.walker
    }

    fn loader(&self) -> &AssemblyLoader {
        self.loader
            .as_deref()
            .unwrap_or_else(|| AssemblyLoader::global())
    }

    /// Sorted type definitions of an assembly.
    ///
    /// # Errors
    ///
    /// Returns an ordering error if two members or types are indistinguishable.
    pub fn type_definitions(&self, assembly: &Assembly) -> SurfaceResult<Vec<TypeDefinition>> {
        self.walker.walk_assembly(assembly)
    }

    /// Report for every public type of an assembly.
    ///
    /// # Errors
    ///
    /// Returns an ordering error if two members or types are indistinguishable.
    #[instrument(skip_all, fields(assembly = %assembly.name))]
    pub fn generate_report(&self, assembly: &Assembly) -> SurfaceResult<String> {
        let definitions = self.walker.walk_assembly(assembly)?;
        let report = ReportRenderer::render(&definitions);
        record_surface_report(&assembly.name);
        info!(types = definitions.len(), "Surface report generated");
        Ok(report)
    }

    /// Report for one type and its visible nested types.
    ///
    /// # Errors
    ///
    /// Returns an ordering error if two members are indistinguishable.
    pub fn generate_type_report(&self, ty: &TypeInfo) -> SurfaceResult<String> {
        let definitions = self.walker.walk_type(ty)?;
        Ok(ReportRenderer::render(&definitions))
    }

    /// Report for the type named `full_name` in `assembly`, with `+`
    /// separating nested type names.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::TypeNotFound` if the assembly declares no such
    /// type, or an ordering error.
    #[instrument(skip(self, assembly), fields(assembly = %assembly.name))]
    pub fn report_for_type(&self, assembly: &Assembly, full_name: &str) -> SurfaceResult<String> {
        let ty = assembly
            .find_type(full_name)
            .ok_or_else(|| SurfaceError::TypeNotFound {
                type_name: full_name.to_string(),
            })?;
        self.generate_type_report(ty)
    }

    /// Report for the metadata file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::AssemblyNotFound` when the file does not exist,
    /// a read or parse error when it is unusable, or an ordering error.
    pub fn report_for_path(&self, path: impl AsRef<Path>) -> SurfaceResult<String> {
        let assembly = self.loader().load(path)?;
        self.generate_report(&assembly)
    }

    /// Like [`report_for_path`](Self::report_for_path) but returns `None` on
    /// any failure, after logging it.
    pub fn try_report_for_path(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = path.as_ref();
        match self.report_for_path(path) {
            Ok(report) => Some(report),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "No surface report produced");
                None
            }
        }
    }

    /// Compares an assembly's report with the baseline at `baseline_path`.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::BaselineRead` when the baseline is missing or
    /// unreadable, or an ordering error from report generation.
    pub fn compare_to_baseline(
        &self,
        assembly: &Assembly,
        baseline_path: impl AsRef<Path>,
    ) -> SurfaceResult<BaselineComparison> {
        let baseline = Baseline::load(baseline_path)?;
        let report = self.generate_report(assembly)?;
        Ok(baseline.compare(&report))
    }
}
