//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around credential strings that
//! validate their contents on construction.

use crate::error::ConfigError;
use std::fmt;

/// A validated New Relic API key.
///
/// The same type carries the REST API key, the Admin API key and the
/// personal (User) API key; the [`Config`](crate::Config) field it is stored
/// in decides which request header it ends up in.
///
/// # Security
///
/// The `Debug` implementation masks the key, displaying only `ApiKey(*****)`
/// so that keys do not leak into logs.
///
/// # Example
///
/// ```rust
/// use newrelic_client::ApiKey;
///
/// let key = ApiKey::new("NRAK-123").unwrap();
/// assert_eq!(key.as_ref(), "NRAK-123");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// Validates a base URL override, requiring an absolute URL with a host.
///
/// A trailing slash is removed so that paths can be appended verbatim.
pub(crate) fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match url::Url::parse(trimmed) {
        Ok(parsed) if parsed.has_host() => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
        assert!(matches!(ApiKey::new("   "), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_key_trims_whitespace() {
        let key = ApiKey::new("  abc123 ").unwrap();
        assert_eq!(key.as_ref(), "abc123");
    }

    #[test]
    fn test_api_key_debug_is_masked() {
        let key = ApiKey::new("super-secret").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(debug, "ApiKey(*****)");
    }

    #[test]
    fn test_validate_base_url_accepts_absolute_urls() {
        assert_eq!(
            validate_base_url("https://api.newrelic.com/v2/").unwrap(),
            "https://api.newrelic.com/v2"
        );
        assert_eq!(
            validate_base_url("http://127.0.0.1:8080").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_validate_base_url_rejects_relative_urls() {
        assert!(matches!(
            validate_base_url("/v2"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            validate_base_url("api.newrelic.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
