//! Test client over any snapshot transport.

use std::future::Future;
use std::sync::Arc;

use breakdance_config::SnapshotConfig;
use breakdance_snapshot::{
    CaptureHandler, HandlerTransport, ReplayHandler, SnapshotResult, Transport, TransportRequest,
    TransportResponse,
};
use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::error::TestError;
use crate::request::{TestRequest, TestRequestBuilder};
use crate::response::TestResponse;

/// Client for driving requests through a [`Transport`] in tests.
///
/// The same test can run against an in-memory handler, a live service whose
/// responses are captured, or previously captured snapshots.
///
/// # Example
///
/// ```
/// use breakdance_test::TestClient;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let client = TestClient::echo().with_base_url("https://host");
/// let response = client.get("/api/Teams").send().await;
///
/// response.assert_success().assert_content_type("application/json");
/// assert_eq!(response.json_value().unwrap()["path"], "/api/Teams");
/// # });
/// ```
#[must_use]
#[derive(Clone)]
pub struct TestClient {
    transport: Arc<dyn Transport>,
    default_headers: Vec<(String, String)>,
    base_url: Option<String>,
}

impl std::fmt::Debug for TestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestClient")
            .field("default_headers", &self.default_headers)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TestClient {
    /// Creates a client over any transport.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            default_headers: Vec::new(),
            base_url: None,
        }
    }

    /// Creates a client whose requests are answered by an async closure.
    pub fn in_memory<F, Fut>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SnapshotResult<TransportResponse>> + Send + 'static,
    {
        Self::new(HandlerTransport::new(handler))
    }

    /// Creates a client that answers with the request method and path as JSON.
    pub fn echo() -> Self {
        Self::new(HandlerTransport::echo())
    }

    /// Creates a client that always answers with `status` and `body`.
    pub fn fixed_response(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(HandlerTransport::fixed(status, body))
    }

    /// Creates a client that forwards to `inner` and records every response
    /// under the configured snapshot root.
    pub fn capturing(inner: impl Transport + 'static, config: &SnapshotConfig) -> Self {
        Self::new(CaptureHandler::from_config(inner, config))
    }

    /// Creates a client that answers only from recorded snapshots.
    pub fn replaying(config: &SnapshotConfig) -> Self {
        Self::new(ReplayHandler::from_config(config))
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Resolves relative request paths against `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Creates a GET request builder.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Creates a POST request builder.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Creates a PUT request builder.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Creates a PATCH request builder.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Creates a DELETE request builder.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Creates a request builder with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequestBuilder::new(method, uri))
    }

    async fn send_internal(&self, request: TestRequest) -> Result<TestResponse, TestError> {
        debug!(method = %request.method, uri = %request.uri, "Sending test request");
        let response = self
            .transport
            .send(request.into_transport_request()?)
            .await?;
        Ok(TestResponse::from_transport(response).await)
    }
}

/// A request builder bound to a [`TestClient`].
#[must_use]
#[derive(Debug)]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl<'a> TestClientRequest<'a> {
    fn new(client: &'a TestClient, builder: TestRequestBuilder) -> Self {
        let mut builder = match &client.base_url {
            Some(base_url) => builder.with_base_url(base_url),
            None => builder,
        };
        for (name, value) in &client.default_headers {
            builder = builder.header(name, value);
        }
        Self { client, builder }
    }

    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets a typed header.
    pub fn header_typed(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.builder = self.builder.header_typed(name, value);
        self
    }

    /// Sets the Accept header.
    pub fn accept(mut self, accept: impl AsRef<str>) -> Self {
        self.builder = self.builder.accept(accept);
        self
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_token(token);
        self
    }

    /// Appends a query parameter.
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.query(name, value);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the transport fails; use
    /// [`try_send`](Self::try_send) to inspect the error instead.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("Test request failed: {e}"),
        }
    }

    /// Sends the request and returns any failure.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        self.client.send_internal(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breakdance_snapshot::SnapshotError;
    use http_body_util::Full;
    use serde_json::json;

    fn reflect_header(name: &'static str) -> TestClient {
        TestClient::in_memory(move |request| async move {
            let value = request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            Ok(http::Response::builder()
                .status(StatusCode::OK)
                .body(Full::new(Bytes::from(value)))?)
        })
    }

    #[tokio::test]
    async fn test_echo_client() {
        let client = TestClient::echo();
        let response = client.get("https://host/test/path").send().await;

        assert_eq!(response.status_code(), 200);
        let json = response.json_value().unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["path"], "/test/path");
    }

    #[tokio::test]
    async fn test_fixed_response() {
        let client = TestClient::fixed_response(StatusCode::CREATED, "created");
        client
            .post("https://host/items")
            .send()
            .await
            .assert_status(StatusCode::CREATED)
            .assert_body_eq("created");
    }

    #[tokio::test]
    async fn test_all_methods() {
        let client = TestClient::echo().with_base_url("https://host");
        for (builder, method) in [
            (client.get("/x"), "GET"),
            (client.post("/x"), "POST"),
            (client.put("/x"), "PUT"),
            (client.patch("/x"), "PATCH"),
            (client.delete("/x"), "DELETE"),
            (client.request(Method::OPTIONS, "/x"), "OPTIONS"),
        ] {
            let response = builder.send().await;
            assert_eq!(response.json_value().unwrap()["method"], method);
        }
    }

    #[tokio::test]
    async fn test_default_headers() {
        let client = reflect_header("x-custom").with_default_header("X-Custom", "default-value");
        client
            .get("https://host/test")
            .send()
            .await
            .assert_body_eq("default-value");

        let overridden = client
            .get("https://host/test")
            .header("X-Custom", "explicit")
            .send()
            .await;
        overridden.assert_body_eq("explicit");
    }

    #[tokio::test]
    async fn test_bearer_and_json() {
        reflect_header("authorization")
            .get("https://host/test")
            .bearer_token("my_token")
            .send()
            .await
            .assert_body_eq("Bearer my_token");

        reflect_header("content-type")
            .post("https://host/users")
            .json(&json!({"name": "Alice"}))
            .send()
            .await
            .assert_body_eq("application/json");
    }

    #[tokio::test]
    async fn test_transport_error_surfaces_in_try_send() {
        let client =
            TestClient::in_memory(|_request| async { Err(SnapshotError::transport("refused")) });
        let err = client.get("https://host/").try_send().await.unwrap_err();
        assert!(matches!(err, TestError::Snapshot(SnapshotError::Transport { .. })));
    }

    #[tokio::test]
    #[should_panic(expected = "Test request failed")]
    async fn test_send_panics_on_failure() {
        TestClient::echo().get("http://[::1").send().await;
    }
}
