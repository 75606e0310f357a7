//! Helpers for processing the QueryRequest and building SQL.

use std::sync::Arc;

use query_engine_metadata::metadata::{self, TypeResolver};
use query_engine_sql::sqm::NodeBuilder;
use sqm_configuration::{Configuration, Dialect};

use super::error::Error;

/// Static information from the configuration, and the builder the query tree is made with.
pub struct Env {
    metadata: Arc<metadata::Metadata>,
    builder: NodeBuilder,
    pub dialect: Dialect,
}

impl Env {
    /// Create a new Env from the runtime configuration.
    pub fn new(configuration: &Configuration) -> Env {
        let resolver: Arc<dyn TypeResolver> = configuration.metadata.clone();
        Env {
            metadata: configuration.metadata.clone(),
            builder: NodeBuilder::new(resolver),
            dialect: configuration.dialect,
        }
    }

    pub fn builder(&self) -> &NodeBuilder {
        &self.builder
    }

    /// Lookup an entity's information in the metadata.
    pub fn lookup_entity(&self, entity: &str) -> Result<&metadata::EntityInfo, Error> {
        self.metadata
            .entities
            .0
            .get(entity)
            .ok_or_else(|| Error::EntityNotFound(entity.to_string()))
    }

    /// Lookup an attribute of an entity.
    pub fn lookup_attribute(
        &self,
        entity: &str,
        attribute: &str,
    ) -> Result<&metadata::AttributeInfo, Error> {
        self.lookup_entity(entity)?
            .attributes
            .get(attribute)
            .ok_or_else(|| Error::AttributeNotFound(attribute.to_string(), entity.to_string()))
    }
}
