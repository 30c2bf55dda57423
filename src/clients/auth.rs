//! Authentication header selection.
//!
//! New Relic endpoints disagree on which header carries the key: the REST v2
//! API reads `X-Api-Key`, NerdGraph reads `Api-Key`, and some REST endpoints
//! accept either. [`AuthStrategy`] picks the headers for a client, and may be
//! overridden per request.

use crate::config::{ApiKey, Config};

/// Header carrying the REST or Admin API key.
pub const X_API_KEY_HEADER: &str = "X-Api-Key";

/// Header carrying the personal (User) API key.
pub const API_KEY_HEADER: &str = "Api-Key";

/// Header announcing which kind of key is sent in `Api-Key`.
pub const AUTH_TYPE_HEADER: &str = "Auth-Type";

/// Selects which authentication headers are attached to a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Sends every configured key: `X-Api-Key` (admin key, else REST key)
    /// and `Api-Key` (personal key).
    #[default]
    Default,
    /// Sends only `X-Api-Key`, using the admin key or the REST key.
    ClassicV2,
    /// Sends the personal key as `Api-Key` with `Auth-Type: User-Api-Key`
    /// when one is configured, else falls back to `X-Api-Key`.
    PersonalApiKeyCapableV2,
    /// Sends only the personal key as `Api-Key`.
    NerdGraph,
}

/// The keys a client authenticates with, copied out of [`Config`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Credentials {
    x_api_key: Option<ApiKey>,
    personal_api_key: Option<ApiKey>,
}

impl Credentials {
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            x_api_key: config.x_api_key().cloned(),
            personal_api_key: config.personal_api_key().cloned(),
        }
    }
}

impl AuthStrategy {
    /// Returns the `(name, value)` header pairs this strategy produces.
    pub(crate) fn headers(self, credentials: &Credentials) -> Vec<(&'static str, String)> {
        let x_api_key = credentials
            .x_api_key
            .as_ref()
            .map(|key| (X_API_KEY_HEADER, key.as_ref().to_string()));
        let api_key = credentials
            .personal_api_key
            .as_ref()
            .map(|key| (API_KEY_HEADER, key.as_ref().to_string()));

        match self {
            Self::Default => x_api_key.into_iter().chain(api_key).collect(),
            Self::ClassicV2 => x_api_key.into_iter().collect(),
            Self::PersonalApiKeyCapableV2 => match api_key {
                Some(header) => vec![header, (AUTH_TYPE_HEADER, "User-Api-Key".to_string())],
                None => x_api_key.into_iter().collect(),
            },
            Self::NerdGraph => api_key.into_iter().collect(),
        }
    }
}
