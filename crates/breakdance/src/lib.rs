//! # Breakdance
//!
//! **Public API surface baselines and HTTP response snapshots**
//!
//! - **Surface Reports** – a deterministic text listing of every public type and member
//! - **Baselines** – the report is checked in; any diff is an API change
//! - **Snapshots** – record responses from real services, replay them offline
//! - **Test Client** – one fluent client for in-memory, capturing and replaying transports
//!
//! ## Quick Start
//!
//! ```
//! use breakdance::prelude::*;
//!
//! let report = PublicApi::new()
//!     .generate_report(&breakdance::surface::fixtures::sample_assembly())
//!     .unwrap();
//! assert!(report.starts_with("public enum Breakdance.Samples.Color : int {"));
//!
//! let uri = "https://host/api/$metadata".parse().unwrap();
//! let path = PathCanonicalizer::new("snapshots")
//!     .canonicalize(&uri, Some("application/xml"))
//!     .unwrap();
//! assert_eq!(path.file_name(), "metadata.xml");
//! ```
//!
//! ## Layout
//!
//! ```text
//! *.surface.json → AssemblyLoader → SurfaceWalker → ReportRenderer → Baseline
//! request → PathCanonicalizer → CaptureHandler (write) / ReplayHandler (read)
//! ```

#![doc(html_root_url = "https://docs.rs/breakdance/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Configuration
pub use breakdance_config as config;

// Logging and metrics
pub use breakdance_telemetry as telemetry;

// Surface reports
pub use breakdance_surface as surface;

// Snapshots
pub use breakdance_snapshot as snapshot;

// Test utilities
pub use breakdance_test as testing;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use breakdance::prelude::*;
///
/// let config = BreakdanceConfig::default();
/// let _replay = TestClient::replaying(&config.snapshot);
/// ```
pub mod prelude {
    pub use breakdance_config::{BreakdanceConfig, ConfigLoader, SnapshotConfig, SurfaceConfig};

    pub use breakdance_surface::{
        Assembly, Baseline, BaselineComparison, PublicApi, SurfaceError, SurfaceResult,
    };

    pub use breakdance_snapshot::{
        CaptureHandler, HandlerTransport, HttpTransport, PathCanonicalizer, ReplayHandler,
        SnapshotError, SnapshotPath, SnapshotResult, Transport,
    };

    pub use breakdance_test::{assert_public_api_matches, TestClient, TestError, TestResponse};
}
