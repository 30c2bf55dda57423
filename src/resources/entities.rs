//! New Relic One entity resource client.
//!
//! Entities are read through NerdGraph. Searches follow `nextCursor` until
//! the last page.
//!
//! # Example
//!
//! ```rust,ignore
//! use newrelic_client::resources::{Entities, SearchEntitiesParams};
//!
//! let entities = Entities::new(&config)?;
//!
//! let apps = entities
//!     .search_entities(&SearchEntitiesParams {
//!         domain: Some("APM".to_string()),
//!         reporting: Some(true),
//!         ..SearchEntitiesParams::default()
//!     })
//!     .await?;
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::{GraphqlClient, HttpError, InvalidHttpRequestError};
use crate::config::Config;
use crate::error::ConfigError;

const ENTITY_FIELDS: &str = "
        accountId
        domain
        entityType
        guid
        name
        permalink
        reporting
        type";

/// A New Relic One entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// The account the entity belongs to.
    #[serde(default)]
    pub account_id: u64,
    /// The entity domain, such as `APM` or `INFRA`.
    #[serde(default)]
    pub domain: String,
    /// The GraphQL type of the entity.
    #[serde(default)]
    pub entity_type: String,
    /// The globally unique entity identifier.
    pub guid: String,
    /// The entity name.
    #[serde(default)]
    pub name: String,
    /// A link to the entity in the New Relic UI.
    #[serde(default)]
    pub permalink: String,
    /// Whether the entity is reporting data.
    #[serde(default)]
    pub reporting: bool,
    /// The entity type within its domain, such as `APPLICATION`.
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// A tag filter for [`SearchEntitiesParams`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// The tag key.
    pub key: String,
    /// The tag value.
    pub value: String,
}

/// Search criteria for [`Entities::search_entities`]. Unset fields are not
/// sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntitiesParams {
    /// Only entities with this alert severity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_severity: Option<String>,
    /// Only entities in this domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Only entities of this infrastructure integration type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrastructure_integration_type: Option<String>,
    /// Only entities whose name matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Only reporting, or only non-reporting, entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting: Option<bool>,
    /// Only entities carrying every tag.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Only entities of this type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEntitiesData {
    actor: SearchActor,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchActor {
    entity_search: EntitySearch,
}

#[derive(Deserialize)]
struct EntitySearch {
    results: EntitySearchResults,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntitySearchResults {
    next_cursor: Option<String>,
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
struct GetEntityData {
    actor: GetEntityActor,
}

#[derive(Deserialize)]
struct GetEntityActor {
    entity: Option<Entity>,
}

#[derive(Deserialize)]
struct GetEntitiesData {
    actor: GetEntitiesActor,
}

#[derive(Deserialize)]
struct GetEntitiesActor {
    #[serde(default)]
    entities: Vec<Entity>,
}

/// Client for New Relic One entities.
#[derive(Clone, Debug)]
pub struct Entities {
    client: GraphqlClient,
}

impl Entities {
    /// Creates an entities client for the configured NerdGraph endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            client: GraphqlClient::new(config)?,
        })
    }

    /// Returns every entity matching `params`.
    ///
    /// # Errors
    ///
    /// Returns the first [`HttpError`] of any page.
    pub async fn search_entities(
        &self,
        params: &SearchEntitiesParams,
    ) -> Result<Vec<Entity>, HttpError> {
        let query = format!(
            "query($queryBuilder: EntitySearchQueryBuilder, $cursor: String) {{
    actor {{
        entitySearch(queryBuilder: $queryBuilder) {{
            results(cursor: $cursor) {{
                nextCursor
                entities {{{ENTITY_FIELDS}
                }}
            }}
        }}
    }}
}}"
        );

        let mut variables = Map::new();
        variables.insert(
            "queryBuilder".to_string(),
            serde_json::to_value(params).map_err(|err| InvalidHttpRequestError::InvalidBody {
                reason: err.to_string(),
            })?,
        );

        self.client
            .query_pages(&query, variables, |data: SearchEntitiesData| {
                let results = data.actor.entity_search.results;
                (results.entities, results.next_cursor)
            })
            .await
    }

    /// Returns the entities with the given GUIDs.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::NotFound`] if none of the GUIDs exist.
    pub async fn get_entities(&self, guids: &[String]) -> Result<Vec<Entity>, HttpError> {
        let query = format!(
            "query($guids: [String!]!) {{
    actor {{
        entities(guids: $guids) {{{ENTITY_FIELDS}
        }}
    }}
}}"
        );

        let mut variables = Map::new();
        variables.insert("guids".to_string(), Value::from(guids.to_vec()));

        let data: GetEntitiesData = self.client.query(&query, Some(&variables)).await?;
        if data.actor.entities.is_empty() {
            return Err(HttpError::NotFound);
        }
        Ok(data.actor.entities)
    }

    /// Returns the entity with the given GUID.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::NotFound`] if the entity does not exist.
    pub async fn get_entity(&self, guid: &str) -> Result<Entity, HttpError> {
        let query = format!(
            "query($guid: String!) {{
    actor {{
        entity(guid: $guid) {{{ENTITY_FIELDS}
        }}
    }}
}}"
        );

        let mut variables = Map::new();
        variables.insert("guid".to_string(), Value::from(guid));

        let data: GetEntityData = self.client.query(&query, Some(&variables)).await?;
        data.actor.entity.ok_or(HttpError::NotFound)
    }
}
