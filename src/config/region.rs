//! New Relic region definitions.
//!
//! This module provides the [`Region`] enum and the static table mapping each
//! region to the base URLs of the New Relic product APIs.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A New Relic deployment region.
///
/// # Example
///
/// ```rust
/// use newrelic_client::{Product, Region};
///
/// // Lenient parsing falls back to US
/// assert_eq!(Region::parse("eu"), Region::Eu);
/// assert_eq!(Region::parse("mars"), Region::Us);
///
/// // Strict parsing rejects unknown regions
/// assert!("mars".parse::<Region>().is_err());
///
/// assert_eq!(
///     Region::Eu.base_url(Product::Rest),
///     "https://api.eu.newrelic.com/v2"
/// );
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Region {
    /// New Relic's US-based production deployment.
    #[default]
    Us,
    /// New Relic's EU-based production deployment.
    Eu,
    /// New Relic's US-based staging deployment (internal use only).
    Staging,
}

/// The API families with a region-specific base URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Product {
    /// The REST v2 API (alerts, APM, plugins, dashboards).
    Rest,
    /// The NerdGraph GraphQL API.
    NerdGraph,
    /// The Infrastructure API.
    Infrastructure,
    /// The Synthetics API.
    Synthetics,
}

/// The per-product base URLs of one region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionUrls {
    /// Base URL of the REST v2 API.
    pub rest: &'static str,
    /// Base URL of the NerdGraph API.
    pub nerdgraph: &'static str,
    /// Base URL of the Infrastructure API.
    pub infrastructure: &'static str,
    /// Base URL of the Synthetics API.
    pub synthetics: &'static str,
}

const US_URLS: RegionUrls = RegionUrls {
    rest: "https://api.newrelic.com/v2",
    nerdgraph: "https://api.newrelic.com/graphql",
    infrastructure: "https://infra-api.newrelic.com/v2",
    synthetics: "https://synthetics.newrelic.com/synthetics/api",
};

const EU_URLS: RegionUrls = RegionUrls {
    rest: "https://api.eu.newrelic.com/v2",
    nerdgraph: "https://api.eu.newrelic.com/graphql",
    infrastructure: "https://infra-api.eu.newrelic.com/v2",
    synthetics: "https://synthetics.eu.newrelic.com/synthetics/api",
};

const STAGING_URLS: RegionUrls = RegionUrls {
    rest: "https://staging-api.newrelic.com/v2",
    nerdgraph: "https://staging-api.newrelic.com/graphql",
    infrastructure: "https://staging-infra-api.newrelic.com/v2",
    synthetics: "https://staging-synthetics.newrelic.com/synthetics/api",
};

impl Region {
    /// Resolves a region name, falling back to [`Region::Us`].
    ///
    /// Matching is case-insensitive. Empty or unrecognized names resolve to
    /// the US region; a warning is logged for unrecognized non-empty names.
    /// Use [`str::parse`] for strict parsing.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            if !name.trim().is_empty() {
                tracing::warn!("Unknown New Relic region '{}', falling back to US", name);
            }
            Self::Us
        })
    }

    /// Returns all known regions.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Us, Self::Eu, Self::Staging]
    }

    /// Returns the base URLs of every product API in this region.
    #[must_use]
    pub const fn urls(self) -> RegionUrls {
        match self {
            Self::Us => US_URLS,
            Self::Eu => EU_URLS,
            Self::Staging => STAGING_URLS,
        }
    }

    /// Returns the base URL of one product API in this region.
    #[must_use]
    pub const fn base_url(self, product: Product) -> &'static str {
        let urls = self.urls();
        match product {
            Product::Rest => urls.rest,
            Product::NerdGraph => urls.nerdgraph,
            Product::Infrastructure => urls.infrastructure,
            Product::Synthetics => urls.synthetics,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Us => f.write_str("US"),
            Self::Eu => f.write_str("EU"),
            Self::Staging => f.write_str("Staging"),
        }
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "eu" => Ok(Self::Eu),
            "staging" => Ok(Self::Staging),
            _ => Err(ConfigError::InvalidRegion {
                region: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Region::parse("US"), Region::Us);
        assert_eq!(Region::parse("us"), Region::Us);
        assert_eq!(Region::parse("Eu"), Region::Eu);
        assert_eq!(Region::parse("STAGING"), Region::Staging);
    }

    #[test]
    fn test_parse_falls_back_to_us() {
        assert_eq!(Region::parse(""), Region::Us);
        assert_eq!(Region::parse("ap"), Region::Us);
        assert_eq!(Region::parse("eu-west"), Region::Us);
    }

    #[test]
    fn test_from_str_is_strict() {
        assert_eq!("eu".parse::<Region>().unwrap(), Region::Eu);
        assert!(matches!(
            "".parse::<Region>(),
            Err(ConfigError::InvalidRegion { .. })
        ));
        assert!(matches!(
            "apac".parse::<Region>(),
            Err(ConfigError::InvalidRegion { region }) if region == "apac"
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for region in Region::all() {
            assert_eq!(Region::parse(&region.to_string()), region);
        }
    }

    #[test]
    fn test_default_region_is_us() {
        assert_eq!(Region::default(), Region::Us);
    }

    #[test]
    fn test_region_url_table() {
        let us = Region::Us.urls();
        assert_eq!(us.rest, "https://api.newrelic.com/v2");
        assert_eq!(us.nerdgraph, "https://api.newrelic.com/graphql");
        assert_eq!(us.infrastructure, "https://infra-api.newrelic.com/v2");
        assert_eq!(
            us.synthetics,
            "https://synthetics.newrelic.com/synthetics/api"
        );

        let eu = Region::Eu.urls();
        assert_eq!(eu.rest, "https://api.eu.newrelic.com/v2");
        assert_eq!(eu.nerdgraph, "https://api.eu.newrelic.com/graphql");
        assert_eq!(eu.infrastructure, "https://infra-api.eu.newrelic.com/v2");
        assert_eq!(
            eu.synthetics,
            "https://synthetics.eu.newrelic.com/synthetics/api"
        );

        let staging = Region::Staging.urls();
        assert_eq!(staging.rest, "https://staging-api.newrelic.com/v2");
        assert_eq!(staging.nerdgraph, "https://staging-api.newrelic.com/graphql");
        assert_eq!(
            staging.infrastructure,
            "https://staging-infra-api.newrelic.com/v2"
        );
        assert_eq!(
            staging.synthetics,
            "https://staging-synthetics.newrelic.com/synthetics/api"
        );
    }

    #[test]
    fn test_base_url_selects_product() {
        assert_eq!(
            Region::Staging.base_url(Product::NerdGraph),
            "https://staging-api.newrelic.com/graphql"
        );
        assert_eq!(
            Region::Eu.base_url(Product::Synthetics),
            "https://synthetics.eu.newrelic.com/synthetics/api"
        );
    }
}
