//! Pluggable HTTP transports.
//!
//! A [`Transport`] turns a request into a response. The capture and replay
//! handlers are transports themselves, so they stack: a capturing handler
//! wraps the transport that reaches the real service, and a replaying
//! handler stands in for it later.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use reqwest::Client;
use tracing::debug;

use crate::error::{SnapshotError, SnapshotResult};

/// A boxed future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Request type every transport accepts.
pub type TransportRequest = Request<Bytes>;

/// Response type every transport returns.
pub type TransportResponse = Response<Full<Bytes>>;

/// Sends HTTP requests somewhere and returns the responses.
pub trait Transport: Send + Sync {
    /// Sends one request.
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, SnapshotResult<TransportResponse>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, SnapshotResult<TransportResponse>> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, SnapshotResult<TransportResponse>> {
        (**self).send(request)
    }
}

type Handler = Arc<
    dyn Fn(TransportRequest) -> BoxFuture<'static, SnapshotResult<TransportResponse>> + Send + Sync,
>;

/// In-memory transport backed by a closure.
///
/// # Example
///
/// ```
/// use breakdance_snapshot::transport::{HandlerTransport, Transport};
/// use bytes::Bytes;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let transport = HandlerTransport::fixed(http::StatusCode::OK, "[]");
/// let request = http::Request::get("https://host/api").body(Bytes::new()).unwrap();
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status(), 200);
/// # });
/// ```
#[derive(Clone)]
pub struct HandlerTransport {
    handler: Handler,
}

impl std::fmt::Debug for HandlerTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTransport").finish_non_exhaustive()
    }
}

impl HandlerTransport {
    /// Creates a transport from an async closure.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SnapshotResult<TransportResponse>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |request| Box::pin(handler(request))),
        }
    }

    /// Transport that always answers with `status` and `body`.
    pub fn fixed(status: http::StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(move |_request| {
            let body = body.clone();
            async move {
                Response::builder()
                    .status(status)
                    .body(Full::new(body))
                    .map_err(SnapshotError::from)
            }
        })
    }

    /// Transport that answers with the request method and path as JSON.
    pub fn echo() -> Self {
        Self::new(|request| async move {
            let body = format!(
                "{{\"method\":\"{}\",\"path\":\"{}\"}}",
                request.method(),
                request.uri().path()
            );
            Response::builder()
                .status(http::StatusCode::OK)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(body)))
                .map_err(SnapshotError::from)
        })
    }
}

impl Transport for HandlerTransport {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, SnapshotResult<TransportResponse>> {
        (self.handler)(request)
    }
}

/// Transport that reaches real services over the network.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given request timeout.
    pub fn new(timeout: Duration) -> SnapshotResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SnapshotError::transport(format!("failed to create client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn forward(&self, request: TransportRequest) -> SnapshotResult<TransportResponse> {
        let (parts, body) = request.into_parts();
        let url = parts.uri.to_string();
        debug!(method = %parts.method, url = %url, "Forwarding request");

        let mut builder = self.client.request(parts.method, &url);
        for (name, value) in &parts.headers {
            builder = builder.header(name, value);
        }
        if !body.is_empty() {
            builder = builder.body(body);
        }

        let upstream = builder.send().await?;
        let mut response = Response::builder().status(upstream.status());
        for (name, value) in upstream.headers() {
            response = response.header(name, value);
        }
        let body = upstream.bytes().await?;
        Ok(response.body(Full::new(body))?)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, SnapshotResult<TransportResponse>> {
        Box::pin(self.forward(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn request(uri: &str) -> TransportRequest {
        Request::get(uri).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn test_fixed_transport() {
        let transport = HandlerTransport::fixed(http::StatusCode::CREATED, "done");
        let response = transport.send(request("https://host/a")).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("done"));
    }

    #[tokio::test]
    async fn test_echo_transport() {
        let transport = HandlerTransport::echo();
        let response = transport.send(request("https://host/api/Teams")).await.unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("{\"method\":\"GET\",\"path\":\"/api/Teams\"}"));
    }

    #[tokio::test]
    async fn test_shared_transport() {
        let transport: Arc<dyn Transport> = Arc::new(HandlerTransport::fixed(http::StatusCode::OK, ""));
        let response = transport.send(request("https://host/")).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handler_errors_propagate() {
        let transport = HandlerTransport::new(|_request| async {
            Err(SnapshotError::transport("connection refused"))
        });
        let err = transport.send(request("https://host/")).await.unwrap_err();
        assert_eq!(err.category(), "transport");
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(5)).is_ok());
    }
}
