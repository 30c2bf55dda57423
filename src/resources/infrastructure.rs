//! Infrastructure alert condition resource client.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{ErrorValue, HttpClient, HttpError, JsonBodyPager, Pager};
use crate::config::{Config, Product};
use crate::error::ConfigError;
use crate::resources::missing_id;

/// An Infrastructure alert condition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCondition {
    /// The condition ID, assigned on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// The policy the condition belongs to.
    pub policy_id: u64,
    /// The condition name.
    pub name: String,
    /// The condition type, such as `infra_metric` or `infra_process_running`.
    #[serde(rename = "type")]
    pub condition_type: String,
    /// Whether the condition is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// How the value is compared with the thresholds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    /// The event type queried by metric conditions.
    #[serde(default, rename = "event_type", skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// The attribute evaluated by metric conditions.
    #[serde(default, rename = "select_value", skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    /// The entity filter.
    #[serde(default, rename = "where_clause", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
    /// The process filter of process conditions.
    #[serde(
        default,
        rename = "process_where_clause",
        skip_serializing_if = "Option::is_none"
    )]
    pub process_where: Option<String>,
    /// The integration provider of integration conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_provider: Option<String>,
    /// The runbook linked from violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook_url: Option<String>,
    /// Hours after which an open violation is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_close_timer: Option<u32>,
    /// The critical threshold.
    #[serde(
        default,
        rename = "critical_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub critical: Option<Threshold>,
    /// The warning threshold.
    #[serde(
        default,
        rename = "warning_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub warning: Option<Threshold>,
    /// When the condition was created.
    #[serde(
        default,
        rename = "created_at_epoch_millis",
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// When the condition was last updated.
    #[serde(
        default,
        rename = "updated_at_epoch_millis",
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A condition threshold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    /// Minutes the threshold must be breached.
    #[serde(default, rename = "duration_minutes")]
    pub duration: u32,
    /// `all` or `any`.
    #[serde(default, rename = "time_function", skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// The threshold value.
    #[serde(default)]
    pub value: i64,
}

/// The Infrastructure API error body.
///
/// The message is the first non-empty `detail`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InfrastructureErrorResponse {
    /// The reported errors.
    #[serde(default)]
    pub errors: Vec<InfrastructureErrorDetail>,
}

/// One entry of [`InfrastructureErrorResponse::errors`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InfrastructureErrorDetail {
    /// The HTTP status, as a string.
    #[serde(default)]
    pub status: String,
    /// The error text.
    #[serde(default)]
    pub detail: String,
}

impl ErrorValue for InfrastructureErrorResponse {
    fn message(&self) -> String {
        self.errors
            .iter()
            .map(|error| error.detail.as_str())
            .find(|detail| !detail.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Serialize)]
struct ListConditionsParams {
    policy_id: u64,
}

#[derive(Deserialize)]
struct ConditionsResponse {
    #[serde(default)]
    data: Vec<AlertCondition>,
}

#[derive(Serialize, Deserialize)]
struct ConditionEnvelope<T> {
    data: T,
}

/// Client for Infrastructure alert conditions.
#[derive(Clone, Debug)]
pub struct Infrastructure {
    client: HttpClient,
    pager: Arc<dyn Pager>,
}

impl Infrastructure {
    /// Creates a client for the configured Infrastructure endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = HttpClient::for_product(config, Product::Infrastructure)?
            .with_error_value::<InfrastructureErrorResponse>();
        Ok(Self {
            client,
            pager: Arc::new(JsonBodyPager),
        })
    }

    /// Lists every condition of a policy, following `links.next`.
    ///
    /// # Errors
    ///
    /// Returns the first [`HttpError`] of any page.
    pub async fn list_conditions(&self, policy_id: u64) -> Result<Vec<AlertCondition>, HttpError> {
        self.client
            .list_all(
                "/alerts/conditions",
                &ListConditionsParams { policy_id },
                self.pager.as_ref(),
                |response| Ok(response.json::<ConditionsResponse>()?.data),
            )
            .await
    }

    /// Returns one condition.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::NotFound`] if the condition does not exist.
    pub async fn get_condition(&self, id: u64) -> Result<AlertCondition, HttpError> {
        let response = self
            .client
            .get(&format!("/alerts/conditions/{id}"), &())
            .await?;
        Ok(response.json::<ConditionEnvelope<AlertCondition>>()?.data)
    }

    /// Creates a condition and returns it as saved.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn create_condition(
        &self,
        condition: &AlertCondition,
    ) -> Result<AlertCondition, HttpError> {
        let response = self
            .client
            .post("/alerts/conditions", &(), &ConditionEnvelope { data: condition })
            .await?;
        Ok(response.json::<ConditionEnvelope<AlertCondition>>()?.data)
    }

    /// Updates a condition and returns it as saved.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the condition has no ID, or
    /// any [`HttpError`] raised by the request.
    pub async fn update_condition(
        &self,
        condition: &AlertCondition,
    ) -> Result<AlertCondition, HttpError> {
        let id = condition
            .id
            .ok_or_else(|| missing_id("infrastructure condition"))?;
        let response = self
            .client
            .put(
                &format!("/alerts/conditions/{id}"),
                &(),
                &ConditionEnvelope { data: condition },
            )
            .await?;
        Ok(response.json::<ConditionEnvelope<AlertCondition>>()?.data)
    }

    /// Deletes a condition.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn delete_condition(&self, id: u64) -> Result<(), HttpError> {
        self.client
            .delete(&format!("/alerts/conditions/{id}"), &())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_condition_deserialization() {
        let condition: AlertCondition = serde_json::from_value(json!({
            "type": "infra_process_running",
            "name": "Java is running",
            "enabled": true,
            "where_clause": "(hostname LIKE '%cassandra%')",
            "id": 13890,
            "created_at_epoch_millis": 1490996713872_i64,
            "updated_at_epoch_millis": 1490996713872_i64,
            "policy_id": 111111,
            "comparison": "equal",
            "critical_threshold": {"value": 0, "duration_minutes": 6},
            "process_where_clause": "(commandName = 'java')"
        }))
        .unwrap();

        assert_eq!(condition.id, Some(13890));
        assert_eq!(condition.condition_type, "infra_process_running");
        assert_eq!(
            condition.critical,
            Some(Threshold {
                duration: 6,
                function: None,
                value: 0
            })
        );
        assert!(condition.warning.is_none());
        assert_eq!(
            condition.created_at,
            Some(Utc.timestamp_millis_opt(1_490_996_713_872).unwrap())
        );
    }

    #[test]
    fn test_error_message_is_first_detail() {
        let body: InfrastructureErrorResponse = serde_json::from_value(json!({
            "errors": [
                {"status": "400", "detail": ""},
                {"status": "400", "detail": "Invalid policy_id"}
            ]
        }))
        .unwrap();
        assert_eq!(body.message(), "Invalid policy_id");
    }

    #[test]
    fn test_success_body_has_no_error_message() {
        let body: InfrastructureErrorResponse =
            serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(body.message(), "");
    }

    #[test]
    fn test_new_condition_omits_server_fields() {
        let condition = AlertCondition {
            policy_id: 42,
            name: "high cpu".to_string(),
            condition_type: "infra_metric".to_string(),
            enabled: true,
            ..AlertCondition::default()
        };
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            json!({"policy_id": 42, "name": "high cpu", "type": "infra_metric", "enabled": true})
        );
    }
}
