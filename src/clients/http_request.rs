//! HTTP request types for the New Relic client.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the New Relic APIs.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::clients::auth::AuthStrategy;
use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the New Relic APIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// An HTTP request to be sent to a New Relic API.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use newrelic_client::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// // GET request with query parameters
/// let get_request = HttpRequest::builder(HttpMethod::Get, "/alerts_policies.json")
///     .query_param("filter[name]", "my policy")
///     .build()
///     .unwrap();
/// assert_eq!(get_request.query.as_deref(), Some("filter%5Bname%5D=my+policy"));
///
/// // POST request with a JSON body
/// let post_request = HttpRequest::builder(HttpMethod::Post, "/alerts_policies.json")
///     .json(&json!({"policy": {"name": "New Policy"}}))
///     .build()
///     .unwrap();
/// assert!(post_request.body.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path relative to the client's base URL, or an absolute URL.
    pub path: String,
    /// The URL-encoded query string, applied only when the URL has none.
    pub query: Option<String>,
    /// The serialized JSON body, if any.
    pub body: Option<Vec<u8>>,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
    /// Overrides the client's authentication strategy for this request.
    pub auth: Option<AuthStrategy>,
    /// Overrides the client's cumulative deadline for this request.
    pub deadline: Option<Duration>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method for the request
    /// * `path` - The path (relative to the base URL) or an absolute URL
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
///
/// Encoding failures are recorded and reported by [`build`](Self::build).
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    query: Option<String>,
    body: Option<Vec<u8>>,
    extra_headers: Option<HashMap<String, String>>,
    auth: Option<AuthStrategy>,
    deadline: Option<Duration>,
    error: Option<InvalidHttpRequestError>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            query: None,
            body: None,
            extra_headers: None,
            auth: None,
            deadline: None,
            error: None,
        }
    }

    fn append_query(&mut self, encoded: String) {
        if encoded.is_empty() {
            return;
        }
        match &mut self.query {
            Some(query) => {
                query.push('&');
                query.push_str(&encoded);
            }
            None => self.query = Some(encoded),
        }
    }

    fn record_error(&mut self, error: InvalidHttpRequestError) {
        self.error.get_or_insert(error);
    }

    /// Encodes a serializable value as query parameters.
    ///
    /// `()` and `None` encode to nothing. `None` fields of a struct are
    /// skipped by serde's `skip_serializing_if`.
    #[must_use]
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Self {
        match serde_urlencoded::to_string(params) {
            Ok(encoded) => self.append_query(encoded),
            Err(e) => self.record_error(InvalidHttpRequestError::InvalidQuery {
                reason: e.to_string(),
            }),
        }
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match serde_urlencoded::to_string([(key.as_ref(), value.as_ref())]) {
            Ok(encoded) => self.append_query(encoded),
            Err(e) => self.record_error(InvalidHttpRequestError::InvalidQuery {
                reason: e.to_string(),
            }),
        }
        self
    }

    /// Serializes a value as the JSON request body.
    #[must_use]
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => self.body = Some(bytes),
            Err(e) => self.record_error(InvalidHttpRequestError::InvalidBody {
                reason: e.to_string(),
            }),
        }
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Overrides the authentication strategy for this request.
    #[must_use]
    pub const fn auth(mut self, strategy: AuthStrategy) -> Self {
        self.auth = Some(strategy);
        self
    }

    /// Bounds the whole call, retries included, by `deadline`.
    #[must_use]
    pub const fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builds the [`HttpRequest`].
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidHttpRequestError`] recorded while
    /// encoding the query or the body.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(HttpRequest {
            http_method: self.http_method,
            path: self.path,
            query: self.query,
            body: self.body,
            extra_headers: self.extra_headers,
            auth: self.auth,
            deadline: self.deadline,
        })
    }
}
