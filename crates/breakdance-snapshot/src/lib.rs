//! HTTP response snapshots for Breakdance.
//!
//! Records responses from real services to files, then serves them back so
//! tests run without the network.
//!
//! ## Key Features
//!
//! - **Deterministic Paths**: [`PathCanonicalizer`] maps URI and Accept header to a file
//! - **Capture**: [`CaptureHandler`] forwards to a live [`Transport`] and records the body
//! - **Replay**: [`ReplayHandler`] answers from the recorded files
//! - **Retries**: concurrent writers back off and retry, honoring cancellation
//!
//! ## Example
//!
//! ```
//! use breakdance_snapshot::PathCanonicalizer;
//!
//! let canonicalizer = PathCanonicalizer::new("snapshots");
//! let uri = "https://host/api/Teams?$expand=Players".parse().unwrap();
//! let path = canonicalizer.canonicalize(&uri, Some("application/json")).unwrap();
//!
//! assert_eq!(path.file_name(), "root.json");
//! assert!(path.directory().ends_with("Players"));
//! ```

#![forbid(unsafe_code)]

pub mod capture;
pub mod error;
pub mod mime;
pub mod path;
pub mod replay;
pub mod retry;
pub mod transport;

pub use capture::CaptureHandler;
pub use error::{SnapshotError, SnapshotResult};
pub use mime::{extension_for_accept, media_type_for_extension};
pub use path::{PathCanonicalizer, SnapshotPath};
pub use replay::ReplayHandler;
pub use retry::RetryPolicy;
pub use transport::{
    BoxFuture, HandlerTransport, HttpTransport, Transport, TransportRequest, TransportResponse,
};
