//! Metadata information regarding the mapped entities and tracked information.

pub mod database;
pub mod instantiation;

// re-export without modules
pub use database::*;
pub use instantiation::{InstantiationError, InstantiatorRegistry, PropertyValues};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata information.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Metadata {
    pub entities: EntitiesInfo,
}

impl Metadata {
    pub fn empty() -> Self {
        Metadata {
            entities: EntitiesInfo::empty(),
        }
    }

    /// Lookup an attribute of an entity.
    pub fn lookup_attribute(&self, entity: &str, attribute: &str) -> Option<&AttributeInfo> {
        self.entities
            .0
            .get(entity)
            .and_then(|info| info.attributes.get(attribute))
    }
}

/// Supplies the result type of the attribute paths a query tree is built from.
///
/// Resolution is total: an attribute the resolver knows nothing about
/// resolves to `ScalarType::Any`.
pub trait TypeResolver: Send + Sync {
    fn attribute_type(&self, entity: &str, attribute: &str) -> ScalarType;
}

impl TypeResolver for Metadata {
    fn attribute_type(&self, entity: &str, attribute: &str) -> ScalarType {
        self.lookup_attribute(entity, attribute)
            .map_or(ScalarType::Any, |info| info.r#type)
    }
}
