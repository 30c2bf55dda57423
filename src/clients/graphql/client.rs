//! GraphQL client implementation for NerdGraph.
//!
//! This module provides the [`GraphqlClient`] type for executing GraphQL
//! queries against the NerdGraph API.

use std::collections::HashSet;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Level;

use crate::clients::graphql::GraphqlErrorResponse;
use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};
use crate::config::{Config, Product};
use crate::error::ConfigError;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Map<String, Value>>,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: T,
}

/// GraphQL client for the NerdGraph API.
///
/// Every query is POSTed to the NerdGraph base URL as
/// `{"query": ..., "variables": ...}` and the `data` field of the response is
/// decoded into the caller's type. A response carrying a non-empty `errors`
/// array fails with every message joined by `", "`.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Clone`, `Send` and `Sync`.
///
/// # Example
///
/// ```rust,ignore
/// use newrelic_client::{ApiKey, Config};
/// use newrelic_client::clients::GraphqlClient;
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct Actor {
///     actor: serde_json::Value,
/// }
///
/// let config = Config::builder()
///     .personal_api_key(ApiKey::new("NRAK-...")?)
///     .build()?;
/// let client = GraphqlClient::new(&config)?;
///
/// let result: Actor = client
///     .query(
///         "query($guid: EntityGuid!) { actor { entity(guid: $guid) { name } } }",
///         json!({"guid": "MXxBUE18QVBQTElDQVRJT058MQ"}).as_object(),
///     )
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct GraphqlClient {
    /// The internal HTTP client for making requests.
    http_client: HttpClient,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a new GraphQL client for the configured NerdGraph endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying HTTP client
    /// cannot be created.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http_client = HttpClient::for_product(config, Product::NerdGraph)?
            .with_error_value::<GraphqlErrorResponse>();
        Ok(Self { http_client })
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Executes a GraphQL query and decodes its `data` field into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Embedded`] when the response carries GraphQL
    /// errors, [`HttpError::Decode`] when `data` does not match `T`, and any
    /// other [`HttpError`] raised by the transport.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<&Map<String, Value>>,
    ) -> Result<T, HttpError> {
        self.send(query, variables, None).await
    }

    /// Executes a GraphQL query bounded by `deadline`, retries included.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query), plus [`HttpError::DeadlineExceeded`].
    pub async fn query_with_deadline<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<&Map<String, Value>>,
        deadline: Duration,
    ) -> Result<T, HttpError> {
        self.send(query, variables, Some(deadline)).await
    }

    /// Runs a cursor-paginated query until no next cursor is returned.
    ///
    /// The `cursor` variable is set before each page (`null` for the first).
    /// `extract` returns the items of a page and its next cursor. The loop
    /// is bounded by the configured maximum page count and stops if a cursor
    /// repeats. The first error discards every item gathered so far.
    ///
    /// # Errors
    ///
    /// Returns the first query error, [`HttpError::PaginationLimitExceeded`]
    /// or [`HttpError::PaginationCycle`].
    pub async fn query_pages<R, T, F>(
        &self,
        query: &str,
        mut variables: Map<String, Value>,
        mut extract: F,
    ) -> Result<Vec<T>, HttpError>
    where
        R: DeserializeOwned,
        F: FnMut(R) -> (Vec<T>, Option<String>),
    {
        let max_pages = self.http_client.max_pages();
        let mut results = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            if pages >= max_pages {
                return Err(HttpError::PaginationLimitExceeded { max_pages });
            }

            variables.insert(
                "cursor".to_string(),
                cursor.clone().map_or(Value::Null, Value::String),
            );
            let page: R = self.query(query, Some(&variables)).await?;
            pages += 1;

            let (items, next_cursor) = extract(page);
            results.extend(items);
            if self.http_client.log_enabled(Level::DEBUG) {
                tracing::debug!(page = pages, items = results.len(), "fetched GraphQL page");
            }

            match next_cursor.filter(|c| !c.is_empty()) {
                Some(next) => {
                    if !seen.insert(next.clone()) {
                        return Err(HttpError::PaginationCycle { cursor: next });
                    }
                    cursor = Some(next);
                }
                None => return Ok(results),
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<&Map<String, Value>>,
        deadline: Option<Duration>,
    ) -> Result<T, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Post, "")
            .json(&GraphqlRequest { query, variables });
        if let Some(deadline) = deadline {
            builder = builder.deadline(deadline);
        }

        let response = self.http_client.request(builder.build()?).await?;
        let envelope: GraphqlResponse<T> = response.json()?;
        Ok(envelope.data)
    }
}
