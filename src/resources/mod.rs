//! Resource clients for New Relic product APIs.
//!
//! Each client is a thin wrapper over the shared transport in
//! [`clients`](crate::clients): it picks the product base URL, installs the
//! product's error body shape and pager, and maps resources to typed structs.
//!
//! # Overview
//!
//! - [`Alerts`]: Alert policies (REST v2)
//! - [`Plugins`]: Plugins (REST v2)
//! - [`Synthetics`]: Synthetic monitors (Synthetics v4)
//! - [`Infrastructure`]: Infrastructure alert conditions
//! - [`Entities`]: New Relic One entities (NerdGraph)
//! - [`NewRelic`]: Every client above, built from one [`Config`]
//!
//! # Example
//!
//! ```rust
//! use newrelic_client::{ApiKey, Config, NewRelic};
//!
//! let config = Config::builder()
//!     .api_key(ApiKey::new("my-rest-api-key").unwrap())
//!     .personal_api_key(ApiKey::new("NRAK-123").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let newrelic = NewRelic::new(&config).unwrap();
//! # let _ = newrelic.alerts;
//! ```

mod alerts;
mod entities;
mod infrastructure;
mod plugins;
mod synthetics;

pub use alerts::{AlertPolicy, Alerts, IncidentPreference};
pub use entities::{Entities, Entity, SearchEntitiesParams, Tag};
pub use infrastructure::{
    AlertCondition, Infrastructure, InfrastructureErrorDetail, InfrastructureErrorResponse,
    Threshold,
};
pub use plugins::{
    ListPluginsParams, MetricThreshold, Plugin, PluginDetails, Plugins, SummaryMetric,
};
pub use synthetics::{
    BulkDeleteReport, FailedDeletion, Monitor, MonitorOptions, MonitorStatus, MonitorType,
    Synthetics, SyntheticsErrorDetail, SyntheticsErrorResponse,
};

use crate::clients::{HttpError, InvalidHttpRequestError};
use crate::config::Config;
use crate::error::ConfigError;

/// Error for an update that targets a resource without an ID.
pub(crate) fn missing_id(resource: &'static str) -> HttpError {
    InvalidHttpRequestError::MissingResourceId { resource }.into()
}

/// Every resource client, sharing one configuration.
#[derive(Clone, Debug)]
pub struct NewRelic {
    /// Alert policies.
    pub alerts: Alerts,
    /// Plugins.
    pub plugins: Plugins,
    /// Synthetic monitors.
    pub synthetics: Synthetics,
    /// Infrastructure alert conditions.
    pub infrastructure: Infrastructure,
    /// New Relic One entities.
    pub entities: Entities,
}

// Verify NewRelic is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NewRelic>();
};

impl NewRelic {
    /// Builds every resource client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            alerts: Alerts::new(config)?,
            plugins: Plugins::new(config)?,
            synthetics: Synthetics::new(config)?,
            infrastructure: Infrastructure::new(config)?,
            entities: Entities::new(config)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_is_invalid_request() {
        let error = missing_id("monitor");
        assert!(matches!(
            error,
            HttpError::InvalidRequest(InvalidHttpRequestError::MissingResourceId {
                resource: "monitor"
            })
        ));
        assert_eq!(error.to_string(), "Cannot address monitor without an ID");
    }

    #[test]
    fn test_facade_builds_with_default_config() {
        let config = Config::builder().build().unwrap();
        assert!(NewRelic::new(&config).is_ok());
    }
}
