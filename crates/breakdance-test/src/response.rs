//! Buffered responses with chainable assertions.

use std::fmt;

use breakdance_snapshot::TransportResponse;
use bytes::Bytes;
use http::{header, HeaderMap, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A fully buffered response.
#[derive(Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Buffers a transport response.
    pub async fn from_transport(response: TransportResponse) -> Self {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .unwrap_or_else(|never| match never {})
            .to_bytes();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// Creates a response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Status code as a number.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|value| value.to_str().ok())
    }

    /// Content-Type header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Raw body.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Body deserialized from JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as a JSON value.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics on a different status.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(self.status, expected, "Expected status {expected}, got {}", self.status);
        self
    }

    /// Asserts a 2xx status.
    ///
    /// # Panics
    ///
    /// Panics on any other status.
    #[track_caller]
    pub fn assert_success(&self) -> &Self {
        assert!(self.is_success(), "Expected success status, got {}", self.status);
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    #[track_caller]
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        match self.header(name) {
            Some(actual) => assert_eq!(actual, expected, "Header '{name}' mismatch"),
            None => panic!("Header '{name}' not found"),
        }
        self
    }

    /// Asserts the Content-Type starts with `expected`, so parameters such
    /// as `charset` are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or has another media type.
    #[track_caller]
    pub fn assert_content_type(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        match self.content_type() {
            Some(actual) => assert!(
                actual.starts_with(expected),
                "Content-Type: expected '{expected}', got '{actual}'"
            ),
            None => panic!("Content-Type header not found"),
        }
        self
    }

    /// Asserts the exact body text.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8 or differs.
    #[track_caller]
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        match self.text() {
            Ok(body) => assert_eq!(body, expected.as_ref(), "Body mismatch"),
            Err(e) => panic!("{e}"),
        }
        self
    }

    /// Asserts the body contains `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8 or lacks the text.
    #[track_caller]
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        match self.text() {
            Ok(body) => assert!(body.contains(expected), "Body should contain '{expected}', got: {body}"),
            Err(e) => panic!("{e}"),
        }
        self
    }

    /// Asserts the value at a dotted JSON path such as `value.0.Name`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON, the path is missing, or the value differs.
    #[track_caller]
    pub fn assert_json_field(&self, path: &str, expected: &serde_json::Value) -> &Self {
        let json = match self.json_value() {
            Ok(json) => json,
            Err(e) => panic!("{e}"),
        };
        match json_path(&json, path) {
            Some(actual) => assert_eq!(actual, expected, "JSON field '{path}' mismatch"),
            None => panic!("JSON path '{path}' not found in {json}"),
        }
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

fn json_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match segment.parse::<usize>() {
            Ok(index) => current.get(index),
            Err(_) => current.get(segment),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    fn odata(body: &str) -> TestResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; odata.metadata=minimal"),
        );
        TestResponse::new(StatusCode::OK, headers, body.to_string())
    }

    #[test]
    fn test_accessors() {
        let response = odata("{\"value\":[]}");
        assert_eq!(response.status_code(), 200);
        assert!(response.is_success());
        assert_eq!(response.text().unwrap(), "{\"value\":[]}");
        assert!(response.header("x-missing").is_none());
    }

    #[test]
    fn test_assertion_chain() {
        odata("{\"value\":[{\"Name\":\"Rangers\",\"Players\":[{\"Number\":9}]}]}")
            .assert_status(StatusCode::OK)
            .assert_success()
            .assert_content_type("application/json")
            .assert_body_contains("Rangers")
            .assert_json_field("value.0.Name", &json!("Rangers"))
            .assert_json_field("value.0.Players.0.Number", &json!(9));
    }

    #[test]
    #[should_panic(expected = "Expected status 404 Not Found")]
    fn test_status_mismatch_panics() {
        odata("").assert_status(StatusCode::NOT_FOUND);
    }

    #[test]
    #[should_panic(expected = "JSON path 'value.3' not found")]
    fn test_missing_json_path_panics() {
        odata("{\"value\":[]}").assert_json_field("value.3", &json!(null));
    }

    #[tokio::test]
    async fn test_from_transport() {
        let response = http::Response::builder()
            .status(StatusCode::ACCEPTED)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(http_body_util::Full::new(Bytes::from("ok")))
            .unwrap();
        let response = TestResponse::from_transport(response).await;
        response
            .assert_status(StatusCode::ACCEPTED)
            .assert_header("content-type", "text/plain")
            .assert_body_eq("ok");
    }
}
