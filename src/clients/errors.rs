//! HTTP-specific error types for the New Relic client.
//!
//! This module contains the error taxonomy returned by every API call.
//!
//! # Error Handling
//!
//! - [`HttpError::NotFound`]: The API answered 404; the body is not inspected
//! - [`HttpError::UnexpectedStatusCode`]: Any other non-2xx response
//! - [`HttpError::Embedded`]: A 2xx response whose body carries an error
//! - [`HttpError::Transport`]: Network failure after the retries ran out
//! - [`HttpError::Decode`]: The body did not match the expected JSON shape
//! - [`HttpError::InvalidRequest`]: The request could not be built
//! - [`HttpError::DeadlineExceeded`]: The cumulative request deadline elapsed
//! - [`HttpError::PaginationLimitExceeded`] / [`HttpError::PaginationCycle`]:
//!   A list operation was stopped by the pagination guards
//!
//! # Example
//!
//! ```rust,ignore
//! use newrelic_client::clients::HttpError;
//!
//! match client.get("/alerts_policies.json", &()).await {
//!     Ok(response) => println!("{}", response.text()),
//!     Err(HttpError::NotFound) => println!("no such resource"),
//!     Err(HttpError::UnexpectedStatusCode { code, message }) => {
//!         println!("API error {code}: {message}");
//!     }
//!     Err(e) => println!("request failed: {e}"),
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

/// Error returned when an HTTP request fails validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The URL could not be parsed.
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// The parser's description of the failure.
        reason: String,
    },

    /// The query parameters could not be encoded.
    #[error("Failed to encode query parameters: {reason}")]
    InvalidQuery {
        /// The encoder's description of the failure.
        reason: String,
    },

    /// A resource that must be addressed by ID has none.
    #[error("Cannot address {resource} without an ID")]
    MissingResourceId {
        /// The kind of resource.
        resource: &'static str,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request body: {reason}")]
    InvalidBody {
        /// The serializer's description of the failure.
        reason: String,
    },
}

/// Unified error type for all API calls.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The resource was not found (HTTP 404).
    #[error("404 not found")]
    NotFound,

    /// The API answered with a non-2xx status other than 404.
    #[error("{code} response returned: {message}")]
    UnexpectedStatusCode {
        /// The HTTP status code of the response.
        code: u16,
        /// The message extracted by the configured error value.
        message: String,
    },

    /// The API answered 2xx but the body carries an error.
    #[error("{message}")]
    Embedded {
        /// The message extracted by the configured error value.
        message: String,
    },

    /// Network or connection failure after all attempts were used.
    #[error("Network error after {attempts} attempt(s): {source}")]
    Transport {
        /// The number of attempts made.
        attempts: u32,
        /// The last transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not match the expected JSON shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The cumulative request deadline elapsed.
    #[error("Request did not complete within {deadline:?}")]
    DeadlineExceeded {
        /// The deadline that was exceeded.
        deadline: Duration,
    },

    /// A list operation fetched the maximum number of pages without reaching the end.
    #[error("Pagination stopped after {max_pages} pages without reaching the last page")]
    PaginationLimitExceeded {
        /// The configured page limit.
        max_pages: usize,
    },

    /// A list operation was sent back to a page it had already fetched.
    #[error("Pagination cycle detected: '{cursor}' was already fetched")]
    PaginationCycle {
        /// The repeated page URL or cursor.
        cursor: String,
    },
}

impl HttpError {
    /// Returns `true` if this is the not-found error kind.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns the HTTP status code carried by the error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound => Some(404),
            Self::UnexpectedStatusCode { code, .. } => Some(*code),
            _ => None,
        }
    }
}
