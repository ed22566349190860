//! Public API surface reports for Breakdance.
//!
//! Turns an assembly's symbol table into a plain-text report listing every
//! externally visible type and member in a fixed order, so the report can be
//! checked into source control and compared on every build. Any diff is a
//! change to the public surface.
//!
//! # Pipeline
//!
//! 1. [`AssemblyLoader`] reads `*.surface.json` metadata into an [`Assembly`]
//! 2. [`SurfaceWalker`] visits visible types and members
//! 3. [`SignatureCanonicalizer`] renders each member as one line
//! 4. [`ordering`] sorts members and types by explicit keys
//! 5. [`ReportRenderer`] lays the result out as text
//! 6. [`Baseline`] compares it with the approved copy
//!
//! # Example
//!
//! ```
//! use breakdance_surface::{fixtures, Baseline, PublicApi};
//!
//! let report = PublicApi::new()
//!     .generate_report(&fixtures::sample_assembly())
//!     .unwrap();
//!
//! let baseline = Baseline::new(fixtures::SAMPLE_REPORT);
//! assert!(baseline.compare(&report).is_match());
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod baseline;
pub mod builder;
pub mod canonical;
pub mod definition;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod model;
pub mod ordering;
pub mod report;
pub mod walker;

pub use api::PublicApi;
pub use baseline::{baseline_path_for, Baseline, BaselineComparison, DiffLine, SurfaceDiff};
pub use canonical::{type_display_name, MemberRef, SignatureCanonicalizer};
pub use definition::{MemberDefinition, TypeDefinition};
pub use error::{SurfaceError, SurfaceResult};
pub use loader::AssemblyLoader;
pub use model::{Assembly, TypeInfo, TypeRef};
pub use ordering::{MemberComparer, MemberKey, MemberKind, TypeCategory, TypeComparer, TypeKey};
pub use report::ReportRenderer;
pub use walker::SurfaceWalker;
