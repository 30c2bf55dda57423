//! HTTP client types for New Relic API communication.
//!
//! This module provides the transport core shared by every product client:
//! request construction, authentication, retries, error classification and
//! pagination.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for one product API
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A response received from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`AuthStrategy`]: Which authentication headers a request carries
//! - [`RetryPolicy`]: Bounded exponential backoff with jitter
//! - [`ErrorValue`]: Pluggable decoding of product-specific error bodies
//! - [`Pager`], [`LinkHeaderPager`], [`JsonBodyPager`]: Next-page discovery
//! - [`graphql::GraphqlClient`]: NerdGraph client built on [`HttpClient`]
//!
//! # Example
//!
//! ```rust,ignore
//! use newrelic_client::{ApiKey, Config};
//! use newrelic_client::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let config = Config::builder()
//!     .api_key(ApiKey::new("my-rest-api-key")?)
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/alerts_policies.json")
//!     .query_param("filter[name]", "production")
//!     .build()?;
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **Network errors**: Retried with exponential backoff
//! - **5xx responses**: Retried with exponential backoff, honoring `Retry-After`
//! - **4xx responses** (404 included): Returned immediately without retry
//!
//! The default policy retries three times. Configure it with
//! [`ConfigBuilder::retry`](crate::ConfigBuilder::retry).

mod auth;
mod error_value;
mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;
mod pager;
mod retry;

pub use auth::{AuthStrategy, API_KEY_HEADER, AUTH_TYPE_HEADER, X_API_KEY_HEADER};
pub use error_value::{DefaultErrorDetail, DefaultErrorResponse, ErrorValue};
pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, REQUESTING_SERVICES_HEADER};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use pager::{JsonBodyPager, LinkHeaderPager, Pager, Paging};
pub use retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_WAIT_MAX, DEFAULT_RETRY_WAIT_MIN};

// Re-export GraphQL client types at the clients module level
pub use graphql::{GraphqlClient, GraphqlErrorResponse};
