//! Alert policy resource client.
//!
//! This module provides the [`Alerts`] client for managing alert policies
//! through the REST v2 API.
//!
//! # Example
//!
//! ```rust,ignore
//! use newrelic_client::resources::{AlertPolicy, Alerts, IncidentPreference};
//!
//! let alerts = Alerts::new(&config)?;
//!
//! // List policies whose name matches a filter
//! let policies = alerts.list_policies(Some("production")).await?;
//!
//! // Create a policy
//! let policy = alerts
//!     .create_policy(&AlertPolicy::new("checkout", IncidentPreference::PerCondition))
//!     .await?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{HttpClient, HttpError, LinkHeaderPager, Pager};
use crate::config::Config;
use crate::error::ConfigError;
use crate::resources::missing_id;

/// How incidents are grouped for an alert policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentPreference {
    /// One open incident per policy.
    #[default]
    PerPolicy,
    /// One open incident per condition.
    PerCondition,
    /// One open incident per condition and target.
    PerConditionAndTarget,
}

/// A New Relic alert policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    /// The unique identifier of the policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// The name of the policy.
    pub name: String,

    /// How incidents are grouped.
    #[serde(default)]
    pub incident_preference: IncidentPreference,

    /// When the policy was created.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// When the policy was last updated.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AlertPolicy {
    /// Creates a policy that has not been saved yet.
    #[must_use]
    pub fn new(name: impl Into<String>, incident_preference: IncidentPreference) -> Self {
        Self {
            name: name.into(),
            incident_preference,
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct ListPoliciesParams<'a> {
    #[serde(rename = "filter[name]", skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Deserialize)]
struct PoliciesResponse {
    #[serde(default)]
    policies: Vec<AlertPolicy>,
}

#[derive(Serialize, Deserialize)]
struct PolicyEnvelope<T> {
    policy: T,
}

/// Client for alert policies.
#[derive(Clone, Debug)]
pub struct Alerts {
    client: HttpClient,
    pager: Arc<dyn Pager>,
}

impl Alerts {
    /// Creates an alerts client for the configured REST endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            client: HttpClient::new(config)?,
            pager: Arc::new(LinkHeaderPager),
        })
    }

    /// Lists every alert policy, optionally filtered by name.
    ///
    /// Follows `Link` header pagination until the last page.
    ///
    /// # Errors
    ///
    /// Returns the first [`HttpError`] of any page.
    pub async fn list_policies(&self, name: Option<&str>) -> Result<Vec<AlertPolicy>, HttpError> {
        let params = ListPoliciesParams { name };
        self.client
            .list_all(
                "/alerts_policies.json",
                &params,
                self.pager.as_ref(),
                |response| Ok(response.json::<PoliciesResponse>()?.policies),
            )
            .await
    }

    /// Returns the alert policy with the given ID.
    ///
    /// The REST API has no single-policy endpoint, so every policy is listed
    /// and filtered locally.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::NotFound`] if no policy has this ID.
    pub async fn get_policy(&self, id: u64) -> Result<AlertPolicy, HttpError> {
        self.list_policies(None)
            .await?
            .into_iter()
            .find(|policy| policy.id == Some(id))
            .ok_or(HttpError::NotFound)
    }

    /// Creates an alert policy and returns it as saved.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn create_policy(&self, policy: &AlertPolicy) -> Result<AlertPolicy, HttpError> {
        let response = self
            .client
            .post("/alerts_policies.json", &(), &PolicyEnvelope { policy })
            .await?;
        Ok(response.json::<PolicyEnvelope<AlertPolicy>>()?.policy)
    }

    /// Updates an alert policy and returns it as saved.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the policy has no ID, or
    /// any [`HttpError`] raised by the request.
    pub async fn update_policy(&self, policy: &AlertPolicy) -> Result<AlertPolicy, HttpError> {
        let id = policy.id.ok_or_else(|| missing_id("alert policy"))?;
        let response = self
            .client
            .put(&format!("/alerts_policies/{id}.json"), &(), &PolicyEnvelope { policy })
            .await?;
        Ok(response.json::<PolicyEnvelope<AlertPolicy>>()?.policy)
    }

    /// Deletes an alert policy and returns it as it was before deletion.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn delete_policy(&self, id: u64) -> Result<AlertPolicy, HttpError> {
        let response = self
            .client
            .delete(&format!("/alerts_policies/{id}.json"), &())
            .await?;
        Ok(response.json::<PolicyEnvelope<AlertPolicy>>()?.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_policy_deserialization() {
        let policy: AlertPolicy = serde_json::from_value(json!({
            "id": 579506,
            "incident_preference": "PER_POLICY",
            "name": "p1",
            "created_at": 1575438237690_i64,
            "updated_at": 1575438237690_i64
        }))
        .unwrap();

        assert_eq!(policy.id, Some(579506));
        assert_eq!(policy.name, "p1");
        assert_eq!(policy.incident_preference, IncidentPreference::PerPolicy);
        assert_eq!(
            policy.created_at,
            Some(Utc.timestamp_millis_opt(1_575_438_237_690).unwrap())
        );
    }

    #[test]
    fn test_new_policy_omits_server_fields() {
        let policy = AlertPolicy::new("checkout", IncidentPreference::PerConditionAndTarget);
        assert_eq!(
            serde_json::to_value(&policy).unwrap(),
            json!({"name": "checkout", "incident_preference": "PER_CONDITION_AND_TARGET"})
        );
    }

    #[test]
    fn test_list_params_encoding() {
        let encoded = serde_urlencoded::to_string(ListPoliciesParams { name: Some("prod db") })
            .unwrap();
        assert_eq!(encoded, "filter%5Bname%5D=prod+db");
        let encoded = serde_urlencoded::to_string(ListPoliciesParams { name: None }).unwrap();
        assert_eq!(encoded, "");
    }
}
