//! Pluggable decoding of API error bodies.
//!
//! Every New Relic product API reports errors with its own JSON shape. An
//! [`ErrorValue`] type describes one such shape: the client speculatively
//! decodes every response body into it and asks it for a message. A body that
//! does not match the shape yields an empty message.
//!
//! # Example
//!
//! ```rust
//! use newrelic_client::clients::ErrorValue;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct CustomError {
//!     #[serde(default)]
//!     custom: String,
//! }
//!
//! impl ErrorValue for CustomError {
//!     fn message(&self) -> String {
//!         self.custom.clone()
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A product-specific error body shape.
///
/// Implementations should return an empty string when the decoded body
/// carries no error, since a non-empty message on a 2xx response is reported
/// as [`HttpError::Embedded`](crate::clients::HttpError::Embedded).
pub trait ErrorValue: DeserializeOwned + Send + Sync + 'static {
    /// Returns the error message carried by the body, or an empty string.
    fn message(&self) -> String;
}

/// Decodes a response body into an error message.
///
/// Built once per [`ErrorValue`] type and shared between client clones.
#[derive(Clone)]
pub(crate) struct ErrorDecoder {
    type_name: &'static str,
    decode: Arc<dyn Fn(&[u8]) -> String + Send + Sync>,
}

impl ErrorDecoder {
    pub(crate) fn of<E: ErrorValue>() -> Self {
        Self {
            type_name: std::any::type_name::<E>(),
            decode: Arc::new(|body: &[u8]| {
                serde_json::from_slice::<E>(body)
                    .map(|value| value.message())
                    .unwrap_or_default()
            }),
        }
    }

    /// Returns the error message of `body`; empty when the body does not match.
    pub(crate) fn message(&self, body: &[u8]) -> String {
        (self.decode)(body)
    }
}

impl Default for ErrorDecoder {
    fn default() -> Self {
        Self::of::<DefaultErrorResponse>()
    }
}

impl fmt::Debug for ErrorDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorDecoder").field(&self.type_name).finish()
    }
}

/// The REST v2 error body: `{"error": {"title": ..., "messages": [...]}}`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DefaultErrorResponse {
    /// The error object.
    #[serde(default)]
    pub error: DefaultErrorDetail,
}

/// The error object of a [`DefaultErrorResponse`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DefaultErrorDetail {
    /// A short description of the error.
    #[serde(default)]
    pub title: String,
    /// Additional detail messages, typically validation failures.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ErrorValue for DefaultErrorResponse {
    fn message(&self) -> String {
        if self.error.messages.is_empty() {
            return self.error.title.clone();
        }
        let details = self.error.messages.join(", ");
        if self.error.title.is_empty() {
            details
        } else {
            format!("{}: {details}", self.error.title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct CustomError {
        #[serde(default)]
        custom: String,
    }

    impl ErrorValue for CustomError {
        fn message(&self) -> String {
            self.custom.clone()
        }
    }

    #[test]
    fn test_default_error_uses_title() {
        let decoder = ErrorDecoder::default();
        assert_eq!(
            decoder.message(br#"{"error":{"title":"error message"}}"#),
            "error message"
        );
    }

    #[test]
    fn test_default_error_appends_messages() {
        let decoder = ErrorDecoder::default();
        let body = br#"{"error":{"title":"Invalid","messages":["name is blank","bad type"]}}"#;
        assert_eq!(decoder.message(body), "Invalid: name is blank, bad type");
    }

    #[test]
    fn test_non_matching_body_yields_empty_message() {
        let decoder = ErrorDecoder::default();
        assert_eq!(decoder.message(br#"{"policies":[]}"#), "");
        assert_eq!(decoder.message(b"[1,2,3]"), "");
        assert_eq!(decoder.message(b""), "");
        assert_eq!(decoder.message(b"<html>oops</html>"), "");
    }

    #[test]
    fn test_custom_error_value() {
        let decoder = ErrorDecoder::of::<CustomError>();
        assert_eq!(decoder.message(br#"{"custom":"boom"}"#), "boom");
        assert_eq!(decoder.message(br#"{"error":{"title":"x"}}"#), "");
    }

    #[test]
    fn test_decoder_debug_names_the_type() {
        let decoder = ErrorDecoder::of::<CustomError>();
        assert!(format!("{decoder:?}").contains("CustomError"));
    }
}
