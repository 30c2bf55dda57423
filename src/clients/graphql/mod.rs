//! GraphQL API client for NerdGraph.
//!
//! This module provides a higher-level GraphQL client built on top of the
//! [`HttpClient`](crate::clients::HttpClient) for executing queries against
//! New Relic's NerdGraph API.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GraphqlClient`]: The GraphQL client with `query()` and `query_pages()`
//! - [`GraphqlErrorResponse`]: The `{"errors": [{"message": ...}]}` error shape
//!
//! # Error Handling
//!
//! NerdGraph answers most query errors with HTTP 200 and an `errors` array.
//! These surface as [`HttpError::Embedded`](crate::clients::HttpError::Embedded)
//! whose message joins every error message with `", "`. Non-2xx responses
//! surface as for any other client.
//!
//! # Example
//!
//! ```rust,ignore
//! use newrelic_client::clients::GraphqlClient;
//! use serde_json::json;
//!
//! let client = GraphqlClient::new(&config)?;
//!
//! let data: serde_json::Value = client
//!     .query("{ actor { user { name email } } }", None)
//!     .await?;
//! println!("User: {}", data["actor"]["user"]["name"]);
//! ```

mod client;
mod errors;

pub use client::GraphqlClient;
pub use errors::{GraphqlErrorDetail, GraphqlErrorResponse};
