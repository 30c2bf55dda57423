//! Error types for client configuration.
//!
//! This module contains the error type returned while building a
//! [`Config`](crate::Config) or constructing a client from one.
//!
//! # Error Handling
//!
//! Configuration constructors return `Result<T, ConfigError>` so that invalid
//! settings fail fast, before any request is sent.
//!
//! # Example
//!
//! ```rust
//! use newrelic_client::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid New Relic API key.")]
    EmptyApiKey,

    /// A base URL override is not an absolute URL.
    #[error("Invalid base URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://api.newrelic.com/v2').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Region name is not one of the known regions.
    #[error("Invalid region '{region}'. Expected one of 'US', 'EU' or 'Staging'.")]
    InvalidRegion {
        /// The region name that was provided.
        region: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to create HTTP client: {reason}")]
    HttpClient {
        /// Description of the failure reported by the HTTP stack.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_error_message() {
        let message = ConfigError::EmptyApiKey.to_string();
        assert!(message.contains("API key cannot be empty"));
    }

    #[test]
    fn test_invalid_base_url_includes_url() {
        let error = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
        };
        assert!(error.to_string().contains("not a url"));
    }

    #[test]
    fn test_invalid_region_lists_known_regions() {
        let error = ConfigError::InvalidRegion {
            region: "mars".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("mars"));
        assert!(message.contains("Staging"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyApiKey;
        let _: &dyn std::error::Error = &error;
    }
}
