//! Configuration types for the New Relic client.
//!
//! This module provides the configuration shared by every client in the
//! crate: API credentials, region, base URL overrides, timeouts, retry
//! behavior and request identification.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Config`]: The immutable configuration snapshot
//! - [`ConfigBuilder`]: A builder for constructing [`Config`] instances
//! - [`ApiKey`]: A validated API key newtype with masked debug output
//! - [`Region`]: The New Relic region, resolving per-product base URLs
//!
//! # Example
//!
//! ```rust
//! use newrelic_client::{ApiKey, Config, Product, Region};
//!
//! let config = Config::builder()
//!     .personal_api_key(ApiKey::new("NRAK-123").unwrap())
//!     .region(Region::Eu)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url(Product::Rest), "https://api.eu.newrelic.com/v2");
//! ```

mod newtypes;
mod region;

pub use newtypes::ApiKey;
pub use region::{Product, Region, RegionUrls};

use std::time::Duration;

use tracing::level_filters::LevelFilter;

use crate::clients::RetryPolicy;
use crate::error::ConfigError;

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default upper bound on the number of pages fetched by one list operation.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Name reported in the `NewRelic-Requesting-Services` header.
pub const DEFAULT_SERVICE_NAME: &str = "newrelic-client-go";

/// Returns the default `User-Agent` header value.
#[must_use]
pub fn default_user_agent() -> String {
    format!(
        "newrelic/{DEFAULT_SERVICE_NAME}/{} (https://github.com/newrelic/{DEFAULT_SERVICE_NAME})",
        env!("CARGO_PKG_VERSION")
    )
}

/// Configuration for the New Relic API clients.
///
/// A `Config` is immutable once built; clients copy what they need out of it
/// at construction time.
///
/// # Thread Safety
///
/// `Config` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use newrelic_client::{ApiKey, Config};
///
/// let config = Config::builder()
///     .admin_api_key(ApiKey::new("admin-key").unwrap())
///     .region_name("staging")
///     .timeout(Duration::from_secs(10))
///     .service_name("my-service")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.requesting_services(), "my-service|newrelic-client-go");
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    api_key: Option<ApiKey>,
    admin_api_key: Option<ApiKey>,
    personal_api_key: Option<ApiKey>,
    region: Region,
    base_url: Option<String>,
    nerdgraph_base_url: Option<String>,
    infrastructure_base_url: Option<String>,
    synthetics_base_url: Option<String>,
    timeout: Duration,
    request_deadline: Option<Duration>,
    user_agent: String,
    service_name: Option<String>,
    retry: RetryPolicy,
    max_pages: usize,
    http_client: Option<reqwest::Client>,
    log_level: LevelFilter,
}

impl Config {
    /// Creates a new builder for constructing a `Config`.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Returns the REST API key, if configured.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the Admin API key, if configured.
    #[must_use]
    pub const fn admin_api_key(&self) -> Option<&ApiKey> {
        self.admin_api_key.as_ref()
    }

    /// Returns the personal (User) API key, if configured.
    #[must_use]
    pub const fn personal_api_key(&self) -> Option<&ApiKey> {
        self.personal_api_key.as_ref()
    }

    /// Returns the key sent in the `X-Api-Key` header.
    ///
    /// The Admin API key takes precedence over the REST API key.
    #[must_use]
    pub fn x_api_key(&self) -> Option<&ApiKey> {
        self.admin_api_key.as_ref().or(self.api_key.as_ref())
    }

    /// Returns the configured region.
    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Returns the base URL for a product API.
    ///
    /// An explicit override wins; otherwise the URL is resolved from the
    /// region table.
    #[must_use]
    pub fn base_url(&self, product: Product) -> &str {
        let override_url = match product {
            Product::Rest => self.base_url.as_deref(),
            Product::NerdGraph => self.nerdgraph_base_url.as_deref(),
            Product::Infrastructure => self.infrastructure_base_url.as_deref(),
            Product::Synthetics => self.synthetics_base_url.as_deref(),
        };
        override_url.unwrap_or_else(|| self.region.base_url(product))
    }

    /// Returns the per-attempt request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the cumulative deadline applied to every request, if any.
    #[must_use]
    pub const fn request_deadline(&self) -> Option<Duration> {
        self.request_deadline
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the consumer service name, if configured.
    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    /// Returns the `NewRelic-Requesting-Services` header value.
    #[must_use]
    pub fn requesting_services(&self) -> String {
        self.service_name.as_deref().map_or_else(
            || DEFAULT_SERVICE_NAME.to_string(),
            |name| format!("{name}|{DEFAULT_SERVICE_NAME}"),
        )
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the maximum number of pages a list operation will fetch.
    #[must_use]
    pub const fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Returns the caller-supplied HTTP client, if any.
    #[must_use]
    pub const fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }

    /// Returns the most verbose level the clients will log at.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            admin_api_key: None,
            personal_api_key: None,
            region: Region::Us,
            base_url: None,
            nerdgraph_base_url: None,
            infrastructure_base_url: None,
            synthetics_base_url: None,
            timeout: DEFAULT_TIMEOUT,
            request_deadline: None,
            user_agent: default_user_agent(),
            service_name: None,
            retry: RetryPolicy::default(),
            max_pages: DEFAULT_MAX_PAGES,
            http_client: None,
            log_level: LevelFilter::TRACE,
        }
    }
}

// Verify Config is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Config>();
};

/// Builder for constructing [`Config`] instances.
///
/// No field is required; requests are simply sent without the
/// authentication headers whose keys are missing.
///
/// # Defaults
///
/// - `region`: US
/// - `timeout`: 30 seconds per attempt
/// - `request_deadline`: none
/// - `user_agent`: `newrelic/newrelic-client-go/<version> (...)`
/// - `retry`: 3 retries, exponential backoff between 1 and 30 seconds
/// - `max_pages`: 1000
/// - `log_level`: `TRACE` (defer to the installed subscriber)
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    api_key: Option<ApiKey>,
    admin_api_key: Option<ApiKey>,
    personal_api_key: Option<ApiKey>,
    region: Option<Region>,
    base_url: Option<String>,
    nerdgraph_base_url: Option<String>,
    infrastructure_base_url: Option<String>,
    synthetics_base_url: Option<String>,
    timeout: Option<Duration>,
    request_deadline: Option<Duration>,
    user_agent: Option<String>,
    service_name: Option<String>,
    retry: Option<RetryPolicy>,
    max_pages: Option<usize>,
    http_client: Option<reqwest::Client>,
    log_level: Option<LevelFilter>,
}

impl ConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the REST API key, sent as `X-Api-Key`.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the Admin API key, sent as `X-Api-Key`.
    #[must_use]
    pub fn admin_api_key(mut self, key: ApiKey) -> Self {
        self.admin_api_key = Some(key);
        self
    }

    /// Sets the personal (User) API key, sent as `Api-Key`.
    #[must_use]
    pub fn personal_api_key(mut self, key: ApiKey) -> Self {
        self.personal_api_key = Some(key);
        self
    }

    /// Sets the region.
    #[must_use]
    pub const fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Sets the region from a name, falling back to US when unrecognized.
    #[must_use]
    pub fn region_name(mut self, name: &str) -> Self {
        self.region = Some(Region::parse(name));
        self
    }

    /// Overrides the REST v2 base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the NerdGraph base URL.
    #[must_use]
    pub fn nerdgraph_base_url(mut self, url: impl Into<String>) -> Self {
        self.nerdgraph_base_url = Some(url.into());
        self
    }

    /// Overrides the Infrastructure API base URL.
    #[must_use]
    pub fn infrastructure_base_url(mut self, url: impl Into<String>) -> Self {
        self.infrastructure_base_url = Some(url.into());
        self
    }

    /// Overrides the Synthetics API base URL.
    #[must_use]
    pub fn synthetics_base_url(mut self, url: impl Into<String>) -> Self {
        self.synthetics_base_url = Some(url.into());
        self
    }

    /// Sets the per-attempt request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a cumulative deadline covering every attempt of a request,
    /// including the waits between retries.
    #[must_use]
    pub const fn request_deadline(mut self, deadline: Duration) -> Self {
        self.request_deadline = Some(deadline);
        self
    }

    /// Replaces the default `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the consumer service name reported in `NewRelic-Requesting-Services`.
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Sets the maximum number of pages fetched by one list operation.
    #[must_use]
    pub const fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Supplies a pre-built HTTP client, replacing the default transport.
    ///
    /// The configured `timeout` is not applied to a supplied client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Caps the verbosity of the events emitted by the clients.
    #[must_use]
    pub const fn log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Builds the [`Config`], validating base URL overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if an override is not an
    /// absolute URL.
    pub fn build(self) -> Result<Config, ConfigError> {
        let validate = |url: Option<String>| {
            url.map(|u| newtypes::validate_base_url(&u)).transpose()
        };

        let user_agent = self
            .user_agent
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(default_user_agent);
        let service_name = self.service_name.filter(|name| !name.trim().is_empty());

        Ok(Config {
            api_key: self.api_key,
            admin_api_key: self.admin_api_key,
            personal_api_key: self.personal_api_key,
            region: self.region.unwrap_or_default(),
            base_url: validate(self.base_url)?,
            nerdgraph_base_url: validate(self.nerdgraph_base_url)?,
            infrastructure_base_url: validate(self.infrastructure_base_url)?,
            synthetics_base_url: validate(self.synthetics_base_url)?,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            request_deadline: self.request_deadline,
            user_agent,
            service_name,
            retry: self.retry.unwrap_or_default(),
            max_pages: self.max_pages.unwrap_or(DEFAULT_MAX_PAGES),
            http_client: self.http_client,
            log_level: self.log_level.unwrap_or(LevelFilter::TRACE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = Config::builder().build().unwrap();

        assert_eq!(config.region(), Region::Us);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.request_deadline().is_none());
        assert!(config.user_agent().starts_with("newrelic/newrelic-client-go/"));
        assert_eq!(config.requesting_services(), "newrelic-client-go");
        assert_eq!(config.retry(), &RetryPolicy::default());
        assert_eq!(config.max_pages(), DEFAULT_MAX_PAGES);
        assert!(config.http_client().is_none());
        assert_eq!(config.log_level(), LevelFilter::TRACE);
    }

    #[test]
    fn test_base_urls_resolve_from_region_when_not_overridden() {
        for region in Region::all() {
            let config = Config::builder().region(region).build().unwrap();
            assert_eq!(config.base_url(Product::Rest), region.urls().rest);
            assert_eq!(config.base_url(Product::NerdGraph), region.urls().nerdgraph);
            assert_eq!(
                config.base_url(Product::Infrastructure),
                region.urls().infrastructure
            );
            assert_eq!(
                config.base_url(Product::Synthetics),
                region.urls().synthetics
            );
        }
    }

    #[test]
    fn test_unknown_region_name_falls_back_to_us() {
        let config = Config::builder().region_name("nowhere").build().unwrap();
        assert_eq!(config.region(), Region::Us);
        assert_eq!(config.base_url(Product::Rest), "https://api.newrelic.com/v2");

        let config = Config::builder().region_name("").build().unwrap();
        assert_eq!(config.region(), Region::Us);
    }

    #[test]
    fn test_base_url_override_wins_over_region() {
        let config = Config::builder()
            .region(Region::Eu)
            .base_url("http://localhost:8080/v2/")
            .build()
            .unwrap();

        assert_eq!(config.base_url(Product::Rest), "http://localhost:8080/v2");
        assert_eq!(
            config.base_url(Product::NerdGraph),
            "https://api.eu.newrelic.com/graphql"
        );
    }

    #[test]
    fn test_invalid_base_url_override_is_rejected() {
        let result = Config::builder().synthetics_base_url("not-a-url").build();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_service_name_is_prefixed() {
        let config = Config::builder()
            .service_name("terraform-provider-newrelic")
            .build()
            .unwrap();
        assert_eq!(
            config.requesting_services(),
            "terraform-provider-newrelic|newrelic-client-go"
        );
    }

    #[test]
    fn test_blank_user_agent_uses_default() {
        let config = Config::builder().user_agent("  ").build().unwrap();
        assert_eq!(config.user_agent(), default_user_agent());

        let config = Config::builder().user_agent("my-agent/1.0").build().unwrap();
        assert_eq!(config.user_agent(), "my-agent/1.0");
    }

    #[test]
    fn test_x_api_key_prefers_admin_key() {
        let config = Config::builder()
            .api_key(ApiKey::new("rest-key").unwrap())
            .admin_api_key(ApiKey::new("admin-key").unwrap())
            .build()
            .unwrap();
        assert_eq!(config.x_api_key().unwrap().as_ref(), "admin-key");

        let config = Config::builder()
            .api_key(ApiKey::new("rest-key").unwrap())
            .build()
            .unwrap();
        assert_eq!(config.x_api_key().unwrap().as_ref(), "rest-key");
    }

    #[test]
    fn test_config_debug_masks_keys() {
        let config = Config::builder()
            .personal_api_key(ApiKey::new("NRAK-SECRET").unwrap())
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("Config"));
        assert!(!debug.contains("NRAK-SECRET"));
    }
}
