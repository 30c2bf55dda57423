//! Synthetics monitor resource client.
//!
//! This module provides the [`Synthetics`] client for managing synthetic
//! monitors through the Synthetics v4 API.
//!
//! # Overview
//!
//! - [`Monitor`]: A synthetic monitor
//! - [`SyntheticsErrorResponse`]: The Synthetics API error body
//! - [`BulkDeleteReport`]: The outcome of [`Synthetics::delete_monitors`]
//!
//! # Example
//!
//! ```rust,ignore
//! use newrelic_client::resources::Synthetics;
//!
//! let synthetics = Synthetics::new(&config)?;
//!
//! let stale: Vec<String> = synthetics
//!     .list_monitors()
//!     .await?
//!     .into_iter()
//!     .filter(|m| m.name.starts_with("tmp-"))
//!     .filter_map(|m| m.id)
//!     .collect();
//!
//! let report = synthetics.delete_monitors(&stale, 8).await;
//! println!("deleted {}, failed {}", report.deleted.len(), report.failed.len());
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Level;

use crate::clients::{ErrorValue, HttpClient, HttpError, LinkHeaderPager, Pager};
use crate::config::{Config, Product};
use crate::error::ConfigError;
use crate::resources::missing_id;

/// The kind of check a monitor performs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorType {
    /// Availability ping.
    #[default]
    Simple,
    /// Page load in a browser.
    Browser,
    /// Scripted API test.
    ScriptApi,
    /// Scripted browser test.
    ScriptBrowser,
}

/// Whether a monitor is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorStatus {
    /// Running and alerting.
    #[default]
    Enabled,
    /// Running without alerting.
    Muted,
    /// Not running.
    Disabled,
}

/// Per-monitor check options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorOptions {
    /// Text that must be present in the response.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub validation_string: String,
    /// Whether to verify SSL certificates.
    #[serde(default, rename = "verifySSL")]
    pub verify_ssl: bool,
    /// Whether to skip the HEAD request.
    #[serde(default, rename = "bypassHEADRequest")]
    pub bypass_head_request: bool,
    /// Whether redirects count as failures.
    #[serde(default)]
    pub treat_redirect_as_failure: bool,
}

/// A synthetic monitor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// The monitor UUID, assigned on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The monitor name.
    pub name: String,
    /// The kind of check.
    #[serde(rename = "type")]
    pub monitor_type: MonitorType,
    /// Minutes between checks.
    pub frequency: u32,
    /// The URI checked by non-scripted monitors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Locations the check runs from.
    #[serde(default)]
    pub locations: Vec<String>,
    /// Whether the monitor is running.
    pub status: MonitorStatus,
    /// The SLA threshold in seconds.
    #[serde(default)]
    pub sla_threshold: f64,
    /// The owning user.
    #[serde(default)]
    pub user_id: u64,
    /// The scripting API version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// Last modification time.
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    /// Creation time.
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Check options.
    #[serde(default)]
    pub options: MonitorOptions,
}

/// Timestamps in the Synthetics API look like `2019-11-27T19:11:05.076+0000`.
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
    const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        DateTime::parse_from_str(&raw, PARSE_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(&raw))
            .map(|time| Some(time.with_timezone(&Utc)))
            .map_err(de::Error::custom)
    }
}

/// The Synthetics API error body.
///
/// ```json
/// {"error": "Validation failed", "errors": [{"error": "name is required"}]}
/// ```
///
/// The reported message is `message` if set, else `error`, else the
/// `errors` entries joined with `", "`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SyntheticsErrorResponse {
    /// The error summary.
    #[serde(default)]
    pub error: String,
    /// Detailed errors.
    #[serde(default)]
    pub errors: Vec<SyntheticsErrorDetail>,
    /// A plain message, preferred over `error` when present.
    #[serde(default)]
    pub message: String,
}

/// One entry of [`SyntheticsErrorResponse::errors`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SyntheticsErrorDetail {
    /// The error text.
    #[serde(default)]
    pub error: String,
}

impl ErrorValue for SyntheticsErrorResponse {
    fn message(&self) -> String {
        if !self.message.is_empty() {
            return self.message.clone();
        }
        if !self.error.is_empty() {
            return self.error.clone();
        }
        self.errors
            .iter()
            .map(|detail| detail.error.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A monitor that could not be deleted.
#[derive(Debug)]
pub struct FailedDeletion {
    /// The monitor ID.
    pub id: String,
    /// Why the deletion failed.
    pub error: HttpError,
}

/// The outcome of [`Synthetics::delete_monitors`], in input order.
#[derive(Debug, Default)]
pub struct BulkDeleteReport {
    /// IDs that were deleted.
    pub deleted: Vec<String>,
    /// IDs that failed, with their error.
    pub failed: Vec<FailedDeletion>,
}

impl BulkDeleteReport {
    /// Returns `true` if every deletion succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Deserialize)]
struct MonitorsResponse {
    #[serde(default)]
    monitors: Vec<Monitor>,
}

/// Client for synthetic monitors.
#[derive(Clone, Debug)]
pub struct Synthetics {
    client: HttpClient,
    pager: Arc<dyn Pager>,
}

impl Synthetics {
    /// Creates a synthetics client for the configured Synthetics endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = HttpClient::for_product(config, Product::Synthetics)?
            .with_error_value::<SyntheticsErrorResponse>();
        Ok(Self {
            client,
            pager: Arc::new(LinkHeaderPager),
        })
    }

    /// Lists every monitor in the account.
    ///
    /// # Errors
    ///
    /// Returns the first [`HttpError`] of any page.
    pub async fn list_monitors(&self) -> Result<Vec<Monitor>, HttpError> {
        self.client
            .list_all("/v4/monitors.json", &(), self.pager.as_ref(), |response| {
                Ok(response.json::<MonitorsResponse>()?.monitors)
            })
            .await
    }

    /// Returns one monitor.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::NotFound`] if the monitor does not exist.
    pub async fn get_monitor(&self, id: &str) -> Result<Monitor, HttpError> {
        let response = self.client.get(&format!("/v4/monitors/{id}"), &()).await?;
        response.json()
    }

    /// Creates a monitor and returns it with the ID assigned by the API.
    ///
    /// The API answers with an empty body; the ID is the last segment of the
    /// `Location` header.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn create_monitor(&self, monitor: &Monitor) -> Result<Monitor, HttpError> {
        let response = self.client.post("/v4/monitors.json", &(), monitor).await?;

        let id = response
            .location()
            .and_then(|location| location.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(ToString::to_string);
        if id.is_none() && self.client.log_enabled(Level::WARN) {
            tracing::warn!("monitor created without a Location header");
        }

        Ok(Monitor {
            id,
            ..monitor.clone()
        })
    }

    /// Replaces a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the monitor has no ID, or
    /// any [`HttpError`] raised by the request.
    pub async fn update_monitor(&self, monitor: &Monitor) -> Result<(), HttpError> {
        let id = monitor.id.as_deref().ok_or_else(|| missing_id("monitor"))?;
        self.client
            .put(&format!("/v4/monitors/{id}"), &(), monitor)
            .await?;
        Ok(())
    }

    /// Deletes a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn delete_monitor(&self, id: &str) -> Result<(), HttpError> {
        self.client
            .delete(&format!("/v4/monitors/{id}"), &())
            .await?;
        Ok(())
    }

    /// Deletes many monitors with at most `concurrency` requests in flight.
    ///
    /// Every ID is attempted; failures are collected instead of aborting the
    /// batch. A `concurrency` of zero is treated as one.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from a deletion task.
    pub async fn delete_monitors(&self, ids: &[String], concurrency: usize) -> BulkDeleteReport {
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, id) in ids.iter().cloned().enumerate() {
            let synthetics = self.clone();
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = permits.acquire_owned().await.ok();
                let result = synthetics.delete_monitor(&id).await;
                (index, id, result)
            });
        }

        let mut outcomes: Vec<Option<(String, Result<(), HttpError>)>> =
            std::iter::repeat_with(|| None).take(ids.len()).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, id, result)) => outcomes[index] = Some((id, result)),
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(err) => {
                    if self.client.log_enabled(Level::WARN) {
                        tracing::warn!(error = %err, "monitor deletion task cancelled");
                    }
                }
            }
        }

        let mut report = BulkDeleteReport::default();
        for (id, result) in outcomes.into_iter().flatten() {
            match result {
                Ok(()) => report.deleted.push(id),
                Err(error) => {
                    if self.client.log_enabled(Level::WARN) {
                        tracing::warn!(monitor = %id, error = %error, "failed to delete monitor");
                    }
                    report.failed.push(FailedDeletion { id, error });
                }
            }
        }

        if self.client.log_enabled(Level::INFO) {
            tracing::info!(
                deleted = report.deleted.len(),
                failed = report.failed.len(),
                "bulk monitor deletion finished"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn monitor_json() -> serde_json::Value {
        json!({
            "id": "72733a02-9701-4279-8ac3-8f6281a5a1a9",
            "name": "test-synthetics-monitor",
            "type": "SIMPLE",
            "frequency": 15,
            "uri": "https://google.com",
            "locations": ["AWS_US_EAST_1"],
            "status": "DISABLED",
            "slaThreshold": 7,
            "options": {},
            "modifiedAt": "2019-11-27T19:11:05.076+0000",
            "createdAt": "2019-11-27T19:11:05.076+0000",
            "userId": 0,
            "apiVersion": "LATEST"
        })
    }

    #[test]
    fn test_monitor_deserialization() {
        let monitor: Monitor = serde_json::from_value(monitor_json()).unwrap();

        assert_eq!(monitor.id.as_deref(), Some("72733a02-9701-4279-8ac3-8f6281a5a1a9"));
        assert_eq!(monitor.monitor_type, MonitorType::Simple);
        assert_eq!(monitor.status, MonitorStatus::Disabled);
        assert_eq!(monitor.options, MonitorOptions::default());
        assert_eq!(
            monitor.created_at,
            Some(Utc.timestamp_millis_opt(1_574_881_865_076).unwrap())
        );
    }

    #[test]
    fn test_timestamp_serializes_in_api_format() {
        let monitor: Monitor = serde_json::from_value(monitor_json()).unwrap();
        let value = serde_json::to_value(&monitor).unwrap();
        assert_eq!(value["modifiedAt"], "2019-11-27T19:11:05.076+0000");
        assert_eq!(value["options"]["verifySSL"], false);
    }

    #[test]
    fn test_error_message_joins_details_when_no_summary() {
        let body: SyntheticsErrorResponse = serde_json::from_value(json!({
            "errors": [{"error": "name is required"}, {"error": "frequency is invalid"}]
        }))
        .unwrap();
        assert_eq!(body.message(), "name is required, frequency is invalid");

        let body: SyntheticsErrorResponse = serde_json::from_value(json!({
            "error": "Validation failed",
            "errors": [{"error": "name is required"}]
        }))
        .unwrap();
        assert_eq!(body.message(), "Validation failed");
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        let body: SyntheticsErrorResponse = serde_json::from_value(json!({
            "error": "Bad Request",
            "message": "Monitor limit reached"
        }))
        .unwrap();
        assert_eq!(body.message(), "Monitor limit reached");

        let body: SyntheticsErrorResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.message(), "");
    }

    #[test]
    fn test_configured_log_level_caps_bulk_delete_logging() {
        use tracing::level_filters::LevelFilter;

        let config = Config::builder()
            .log_level(LevelFilter::ERROR)
            .build()
            .unwrap();
        let synthetics = Synthetics::new(&config).unwrap();
        assert!(synthetics.client.log_enabled(Level::ERROR));
        assert!(!synthetics.client.log_enabled(Level::WARN));
        assert!(!synthetics.client.log_enabled(Level::INFO));

        let quiet = Config::builder().log_level(LevelFilter::OFF).build().unwrap();
        let synthetics = Synthetics::new(&quiet).unwrap();
        assert!(!synthetics.client.log_enabled(Level::ERROR));
    }

    #[test]
    fn test_monitor_body_is_not_an_error() {
        let body: SyntheticsErrorResponse = serde_json::from_value(monitor_json()).unwrap();
        assert_eq!(body.message(), "");
    }
}
