//! Plugin resource client.
//!
//! This module provides the [`Plugins`] client for reading the plugins
//! reporting to an account through the REST v2 API.

use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::clients::{HttpClient, HttpError, LinkHeaderPager, Pager};
use crate::config::Config;
use crate::error::ConfigError;

/// A plugin reporting to an account.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    /// The unique identifier of the plugin.
    pub id: u64,
    /// The name of the plugin.
    #[serde(default)]
    pub name: String,
    /// The globally unique plugin identifier.
    #[serde(default)]
    pub guid: String,
    /// The publisher of the plugin.
    #[serde(default)]
    pub publisher: String,
    /// The number of agents reporting for this plugin.
    #[serde(default)]
    pub component_agent_count: u64,
    /// Extended metadata, only returned for detailed requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PluginDetails>,
    /// The metrics summarizing the plugin's health.
    #[serde(default)]
    pub summary_metrics: Vec<SummaryMetric>,
}

/// Extended plugin metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDetails {
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the plugin is publicly listed.
    #[serde(default)]
    pub is_public: bool,
    /// The short display name.
    #[serde(default)]
    pub short_name: Option<String>,
    /// The published version.
    #[serde(default)]
    pub published_version: Option<String>,
    /// Where to download the plugin.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Where to get support.
    #[serde(default)]
    pub publisher_support_url: Option<String>,
    /// Whether unpublished changes exist.
    #[serde(default)]
    pub has_unpublished_changes: bool,
}

/// A metric summarizing a plugin's health.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetric {
    /// The unique identifier of the metric.
    pub id: u64,
    /// The display name.
    #[serde(default)]
    pub name: String,
    /// The metric name.
    #[serde(default)]
    pub metric: String,
    /// The aggregation applied to the metric.
    #[serde(default)]
    pub value_function: String,
    /// The caution and critical thresholds.
    #[serde(default)]
    pub thresholds: MetricThreshold,
}

/// Thresholds of a [`SummaryMetric`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricThreshold {
    /// The caution threshold, if set.
    #[serde(default)]
    pub caution: Option<f64>,
    /// The critical threshold, if set.
    #[serde(default)]
    pub critical: Option<f64>,
}

/// Filters for [`Plugins::list_plugins`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListPluginsParams {
    /// Only return the plugin with this GUID.
    #[serde(rename = "filter[guid]", skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Only return plugins with these IDs.
    #[serde(
        rename = "filter[ids]",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "comma_separated"
    )]
    pub ids: Vec<u64>,
}

fn comma_separated<S: Serializer>(ids: &[u64], serializer: S) -> Result<S::Ok, S::Error> {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

#[derive(Serialize)]
struct GetPluginParams {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    detailed: bool,
}

#[derive(Deserialize)]
struct PluginsResponse {
    #[serde(default)]
    plugins: Vec<Plugin>,
}

#[derive(Deserialize)]
struct PluginResponse {
    plugin: Plugin,
}

/// Client for plugins.
#[derive(Clone, Debug)]
pub struct Plugins {
    client: HttpClient,
    pager: Arc<dyn Pager>,
}

impl Plugins {
    /// Creates a plugins client for the configured REST endpoint.
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

    /// Lists every plugin matching `params`.
    ///
    /// # Errors
    ///
    /// Returns the first [`HttpError`] of any page.
    pub async fn list_plugins(&self, params: &ListPluginsParams) -> Result<Vec<Plugin>, HttpError> {
        self.client
            .list_all("/plugins.json", params, self.pager.as_ref(), |response| {
                Ok(response.json::<PluginsResponse>()?.plugins)
            })
            .await
    }

    /// Returns one plugin. With `detailed`, [`Plugin::details`] is populated.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::NotFound`] if the plugin does not exist.
    pub async fn get_plugin(&self, id: u64, detailed: bool) -> Result<Plugin, HttpError> {
        let response = self
            .client
            .get(&format!("/plugins/{id}.json"), &GetPluginParams { detailed })
            .await?;
        Ok(response.json::<PluginResponse>()?.plugin)
    }
}
