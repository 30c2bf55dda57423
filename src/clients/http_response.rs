//! HTTP response type for the New Relic client.
//!
//! This module provides the [`HttpResponse`] type, giving access to the
//! status, the headers and the raw body of an API response.

use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::clients::errors::HttpError;

/// An HTTP response from a New Relic API.
///
/// Header names are stored lower-cased; a header may carry several values.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Location` header value, if present.
    ///
    /// The Synthetics API reports the URL of a created monitor here.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `Retry-After` header as a delay, if present.
    ///
    /// Only the delay-seconds form is understood.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        let seconds = self.header("retry-after")?.trim().parse::<f64>().ok()?;
        Duration::try_from_secs_f64(seconds).ok()
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decodes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(HttpError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn response_with_header(name: &str, value: &str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert(name.to_string(), vec![value.to_string()]);
        HttpResponse::new(200, headers, Vec::new())
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), Vec::new());
            assert!(
                response.is_ok(),
                "Expected is_ok() to be true for code {code}"
            );
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_other_codes() {
        for code in [199, 300, 400, 404, 429, 500, 503] {
            let response = HttpResponse::new(code, HashMap::new(), Vec::new());
            assert!(!response.is_ok(), "Expected is_ok() to be false for {code}");
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = response_with_header("x-request-id", "abc-123-xyz");
        assert_eq!(response.header("X-Request-Id"), Some("abc-123-xyz"));
        assert_eq!(response.request_id(), Some("abc-123-xyz"));
        assert!(response.header("link").is_none());
    }

    #[test]
    fn test_location_extraction() {
        let response = response_with_header(
            "location",
            "https://synthetics.newrelic.com/synthetics/api/v3/monitors/72733a02",
        );
        assert!(response.location().unwrap().ends_with("/monitors/72733a02"));
    }

    #[test]
    fn test_retry_after_parsing() {
        let response = response_with_header("retry-after", "2.5");
        assert_eq!(response.retry_after(), Some(Duration::from_millis(2500)));

        let response = response_with_header("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT");
        assert!(response.retry_after().is_none());

        let response = response_with_header("retry-after", "-1");
        assert!(response.retry_after().is_none());
    }

    #[test]
    fn test_json_decodes_body() {
        #[derive(Deserialize)]
        struct Custom {
            custom: String,
        }

        let response = HttpResponse::new(
            200,
            HashMap::new(),
            br#"{"custom":"custom response string"}"#.to_vec(),
        );
        let value: Custom = response.json().unwrap();
        assert_eq!(value.custom, "custom response string");
    }

    #[test]
    fn test_json_reports_decode_error() {
        let response = HttpResponse::new(200, HashMap::new(), b"not json".to_vec());
        let result = response.json::<serde_json::Value>();
        assert!(matches!(result, Err(HttpError::Decode(_))));
    }

    #[test]
    fn test_text_is_lossy() {
        let response = HttpResponse::new(500, HashMap::new(), b"bad gateway".to_vec());
        assert_eq!(response.text(), "bad gateway");
    }
}
