//! # New Relic API Client
//!
//! An async Rust client for the New Relic REST v2, Infrastructure,
//! Synthetics and NerdGraph (GraphQL) APIs.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`Config`] and [`ConfigBuilder`]
//! - Region-aware base URL resolution via [`Region`] and [`Product`]
//! - An async HTTP client with bounded retries, pluggable error body
//!   decoding and pagination ([`HttpClient`])
//! - A NerdGraph client with cursor pagination ([`GraphqlClient`])
//! - Resource clients for alerts, plugins, synthetics, infrastructure
//!   conditions and entities, bundled by [`NewRelic`]
//!
//! ## Quick Start
//!
//! ```rust
//! use newrelic_client::{ApiKey, Config, Product, Region};
//!
//! let config = Config::builder()
//!     .api_key(ApiKey::new("your-rest-api-key").unwrap())
//!     .personal_api_key(ApiKey::new("NRAK-your-user-key").unwrap())
//!     .region(Region::Eu)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url(Product::NerdGraph), "https://api.eu.newrelic.com/graphql");
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use newrelic_client::{Config, HttpClient, HttpError};
//!
//! let client = HttpClient::new(&config)?;
//!
//! match client.get("/applications/123.json", &()).await {
//!     Ok(response) => println!("{}", response.text()),
//!     Err(HttpError::NotFound) => println!("no such application"),
//!     Err(err) => return Err(err.into()),
//! }
//! ```
//!
//! ## Resource Clients
//!
//! ```rust,ignore
//! use newrelic_client::NewRelic;
//!
//! let newrelic = NewRelic::new(&config)?;
//! let policies = newrelic.alerts.list_policies(None).await?;
//! let monitors = newrelic.synthetics.list_monitors().await?;
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Requests are logged at `DEBUG`, response details at `TRACE` and retries
//! at `WARN`. [`ConfigBuilder::log_level`] caps what the clients emit.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is passed explicitly to clients
//! - **Fail-fast validation**: Invalid keys and URLs are rejected at build time
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime

pub mod clients;
pub mod config;
mod error;
pub mod resources;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, Config, ConfigBuilder, Product, Region, RegionUrls};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    AuthStrategy, ErrorValue, GraphqlClient, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, InvalidHttpRequestError, RetryPolicy,
};

pub use resources::NewRelic;
