//! # Breakdance Test
//!
//! Test utilities for Breakdance: a fluent client over snapshot transports
//! and public API baseline assertions.
//!
//! ## Key Features
//!
//! - **One Client, Three Modes**: in-memory handlers, live capture, offline replay
//! - **Request Builder**: headers, query parameters, JSON bodies
//! - **Response Assertions**: status, headers, body text, JSON paths
//! - **Baselines**: [`assert_public_api_matches`] fails with a line diff
//!
//! ## Example
//!
//! ```
//! use breakdance_config::SnapshotConfig;
//! use breakdance_test::TestClient;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let dir = tempfile::tempdir().unwrap();
//! let config = SnapshotConfig {
//!     root: dir.path().to_path_buf(),
//!     ..SnapshotConfig::default()
//! };
//!
//! // First run: record what the service returns.
//! let live = TestClient::capturing(breakdance_snapshot::HandlerTransport::echo(), &config);
//! live.get("https://host/api/Teams").accept("application/json").send().await;
//!
//! // Later runs: no service needed.
//! let offline = TestClient::replaying(&config);
//! offline
//!     .get("https://host/api/Teams")
//!     .accept("application/json")
//!     .send()
//!     .await
//!     .assert_content_type("application/json")
//!     .assert_body_contains("/api/Teams");
//! # });
//! ```

#![forbid(unsafe_code)]

pub mod baseline;
pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use baseline::{
    assert_public_api_matches, assert_public_api_matches_with, verify_baseline, BaselineOutcome,
    UPDATE_BASELINES_ENV,
};
pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
