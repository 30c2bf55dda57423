//! HTTP client for New Relic API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the New Relic APIs with automatic retry handling, error
//! classification and pagination.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use url::Url;

use crate::clients::auth::{AuthStrategy, Credentials};
use crate::clients::error_value::{ErrorDecoder, ErrorValue};
use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::pager::Pager;
use crate::clients::retry::RetryPolicy;
use crate::config::{Config, Product};
use crate::error::ConfigError;

/// Header identifying the services a request was issued on behalf of.
pub const REQUESTING_SERVICES_HEADER: &str = "NewRelic-Requesting-Services";

/// HTTP client for making requests to one New Relic product API.
///
/// The client handles:
/// - Base URL resolution from the region or an explicit override
/// - Default headers (`Content-Type`, `User-Agent`, requesting services)
/// - Authentication headers according to its [`AuthStrategy`]
/// - Retries of transport failures and 5xx responses
/// - Classification of error responses through a pluggable [`ErrorValue`]
///
/// # Thread Safety
///
/// `HttpClient` is `Clone`, `Send` and `Sync`. Clones share the underlying
/// connection pool. The error value and authentication strategy can only be
/// changed through `&mut self`, so they cannot change under in-flight
/// requests.
///
/// # Example
///
/// ```rust,ignore
/// use newrelic_client::{ApiKey, Config};
/// use newrelic_client::clients::HttpClient;
///
/// let config = Config::builder()
///     .api_key(ApiKey::new("my-rest-api-key")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let response = client.get("/alerts_policies.json", &()).await?;
/// let policies: serde_json::Value = response.json()?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL that relative paths are appended to.
    base_url: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    credentials: Credentials,
    auth: AuthStrategy,
    error_decoder: ErrorDecoder,
    retry: RetryPolicy,
    deadline: Option<Duration>,
    max_pages: usize,
    log_level: LevelFilter,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client for the REST v2 API.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying HTTP client
    /// cannot be created.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::for_product(config, Product::Rest)
    }

    /// Creates a client for one product API.
    ///
    /// NerdGraph clients authenticate with [`AuthStrategy::NerdGraph`]; all
    /// others with [`AuthStrategy::Default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying HTTP client
    /// cannot be created.
    pub fn for_product(config: &Config, product: Product) -> Result<Self, ConfigError> {
        let client = match config.http_client() {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .use_rustls_tls()
                .timeout(config.timeout())
                .build()
                .map_err(|e| ConfigError::HttpClient {
                    reason: e.to_string(),
                })?,
        };

        let mut default_headers = HashMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert("User-Agent".to_string(), config.user_agent().to_string());
        default_headers.insert(
            REQUESTING_SERVICES_HEADER.to_string(),
            config.requesting_services(),
        );

        let auth = match product {
            Product::NerdGraph => AuthStrategy::NerdGraph,
            _ => AuthStrategy::Default,
        };

        Ok(Self {
            client,
            base_url: config.base_url(product).to_string(),
            default_headers,
            credentials: Credentials::from_config(config),
            auth,
            error_decoder: ErrorDecoder::default(),
            retry: config.retry().clone(),
            deadline: config.request_deadline(),
            max_pages: config.max_pages(),
            log_level: config.log_level(),
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the authentication strategy for this client.
    #[must_use]
    pub const fn auth_strategy(&self) -> AuthStrategy {
        self.auth
    }

    /// Returns the maximum number of pages [`list_all`](Self::list_all) fetches.
    #[must_use]
    pub const fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Returns `true` if events at `level` pass the configured log level.
    pub(crate) fn log_enabled(&self, level: Level) -> bool {
        self.log_level >= level
    }

    /// Installs the error body shape used to classify responses.
    pub fn set_error_value<E: ErrorValue>(&mut self) -> &mut Self {
        self.error_decoder = ErrorDecoder::of::<E>();
        self
    }

    /// Consuming variant of [`set_error_value`](Self::set_error_value).
    #[must_use]
    pub fn with_error_value<E: ErrorValue>(mut self) -> Self {
        self.set_error_value::<E>();
        self
    }

    /// Changes the authentication strategy of this client.
    pub fn set_auth_strategy(&mut self, strategy: AuthStrategy) -> &mut Self {
        self.auth = strategy;
        self
    }

    /// Sends a GET request.
    ///
    /// Pass `&()` when there are no query parameters.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .query(query)
            .build()?;
        self.request(request).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post<Q, B>(&self, path: &str, query: &Q, body: &B) -> Result<HttpResponse, HttpError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .query(query)
            .json(body)
            .build()?;
        self.request(request).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put<Q, B>(&self, path: &str, query: &Q, body: &B) -> Result<HttpResponse, HttpError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .query(query)
            .json(body)
            .build()?;
        self.request(request).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path)
            .query(query)
            .build()?;
        self.request(request).await
    }

    /// Sends an HTTP request and classifies the response.
    ///
    /// The request's deadline, or the client's configured deadline, bounds
    /// every attempt and every wait between attempts. Dropping the returned
    /// future cancels the call.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - The URL cannot be resolved (`InvalidRequest`)
    /// - The network fails on every attempt (`Transport`)
    /// - The API answers 404 (`NotFound`)
    /// - The API answers any other non-2xx status (`UnexpectedStatusCode`)
    /// - A 2xx body carries an error message (`Embedded`)
    /// - The deadline elapses (`DeadlineExceeded`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        match request.deadline.or(self.deadline) {
            Some(deadline) => tokio::time::timeout(deadline, self.execute(request))
                .await
                .map_err(|_| HttpError::DeadlineExceeded { deadline })?,
            None => self.execute(request).await,
        }
    }

    /// Fetches every page of a list endpoint.
    ///
    /// Pages are fetched sequentially starting at `path`. `extract` pulls the
    /// items out of each page and `pager` locates the next one. The first
    /// error aborts the loop and the items gathered so far are discarded.
    ///
    /// # Errors
    ///
    /// Returns the first error of any page fetch or `extract` call,
    /// [`HttpError::PaginationLimitExceeded`] after `max_pages` pages, or
    /// [`HttpError::PaginationCycle`] if a page URL repeats.
    pub async fn list_all<T, Q, F>(
        &self,
        path: &str,
        query: &Q,
        pager: &dyn Pager,
        mut extract: F,
    ) -> Result<Vec<T>, HttpError>
    where
        Q: Serialize + ?Sized,
        F: FnMut(&HttpResponse) -> Result<Vec<T>, HttpError>,
    {
        let encoded =
            serde_urlencoded::to_string(query).map_err(|e| InvalidHttpRequestError::InvalidQuery {
                reason: e.to_string(),
            })?;

        let mut results = Vec::new();
        let mut seen = HashSet::new();
        let mut next_url = path.to_string();
        let mut pages = 0;

        loop {
            if pages >= self.max_pages {
                return Err(HttpError::PaginationLimitExceeded {
                    max_pages: self.max_pages,
                });
            }

            // Compare resolved URLs so a relative first page and an absolute
            // link back to it count as the same page.
            let resolved = self.make_url(&next_url, Some(&encoded))?;
            if !seen.insert(resolved.to_string()) {
                return Err(HttpError::PaginationCycle {
                    cursor: resolved.into(),
                });
            }

            let response = self.get(resolved.as_str(), &()).await?;
            pages += 1;
            results.extend(extract(&response)?);

            if self.log_enabled(Level::DEBUG) {
                tracing::debug!(page = pages, items = results.len(), url = %next_url, "fetched page");
            }

            match pager.parse(&response).next {
                Some(next) => next_url = next,
                None => return Ok(results),
            }
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = self.make_url(&request.path, request.query.as_deref())?;

        // Merge headers
        let mut headers = self.default_headers.clone();
        for (key, value) in request.auth.unwrap_or(self.auth).headers(&self.credentials) {
            headers.insert(key.to_string(), value);
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        if self.log_enabled(Level::DEBUG) {
            tracing::debug!(method = %request.http_method, url = %url, "performing request");
        }

        let response = self.send_with_retries(&request, &url, &headers).await?;

        if self.log_enabled(Level::TRACE) {
            tracing::trace!(
                status = response.code,
                body_len = response.body.len(),
                "received response"
            );
        }

        self.classify(response)
    }

    async fn send_with_retries(
        &self,
        request: &HttpRequest,
        url: &Url,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, HttpError> {
        let mut attempt: u32 = 0;
        loop {
            let mut req_builder = self
                .client
                .request(request.http_method.into(), url.clone());
            for (key, value) in headers {
                req_builder = req_builder.header(key.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.clone());
            }

            let outcome = match req_builder.send().await {
                Ok(res) => Self::read_response(res).await,
                Err(e) => Err(e),
            };

            let can_retry = attempt < self.retry.max_retries();
            let delay = match outcome {
                Ok(response) if can_retry && self.retry.should_retry_status(response.code) => {
                    let delay = self.retry.backoff(attempt, response.retry_after());
                    if self.log_enabled(Level::WARN) {
                        tracing::warn!(
                            attempt = attempt + 1,
                            status = response.code,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "retrying request to {} after server error",
                            url
                        );
                    }
                    delay
                }
                Ok(response) => return Ok(response),
                Err(e) if can_retry && self.retry.should_retry_error(&e) => {
                    let delay = self.retry.backoff(attempt, None);
                    if self.log_enabled(Level::WARN) {
                        tracing::warn!(
                            attempt = attempt + 1,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "retrying request to {} after network error: {}",
                            url,
                            e
                        );
                    }
                    delay
                }
                Err(e) => {
                    return Err(HttpError::Transport {
                        attempts: attempt + 1,
                        source: e,
                    })
                }
            };

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn read_response(res: reqwest::Response) -> Result<HttpResponse, reqwest::Error> {
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?;
        Ok(HttpResponse::new(code, headers, body.to_vec()))
    }

    /// Maps a response to the error taxonomy.
    ///
    /// The status code is checked first; a 2xx body is then probed for an
    /// embedded error.
    fn classify(&self, response: HttpResponse) -> Result<HttpResponse, HttpError> {
        if response.code == 404 {
            return Err(HttpError::NotFound);
        }

        let message = self.error_decoder.message(&response.body);

        if !response.is_ok() {
            return Err(HttpError::UnexpectedStatusCode {
                code: response.code,
                message,
            });
        }

        if !message.is_empty() {
            return Err(HttpError::Embedded { message });
        }

        Ok(response)
    }

    /// Resolves `path` against the base URL and applies `query`.
    ///
    /// Absolute URLs are used verbatim. `query` is only applied when the
    /// resolved URL carries no query of its own.
    fn make_url(&self, path: &str, query: Option<&str>) -> Result<Url, InvalidHttpRequestError> {
        let invalid = |raw: &str, e: url::ParseError| InvalidHttpRequestError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        };

        let mut url = match Url::parse(path) {
            Ok(url) if url.has_host() => url,
            _ => {
                let joined = if path.is_empty() || path.starts_with('/') || path.starts_with('?') {
                    format!("{}{path}", self.base_url)
                } else {
                    format!("{}/{path}", self.base_url)
                };
                Url::parse(&joined).map_err(|e| invalid(&joined, e))?
            }
        };

        let has_query = url.query().is_some_and(|q| !q.is_empty());
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            if !has_query {
                url.set_query(Some(query));
            }
        }

        Ok(url)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
