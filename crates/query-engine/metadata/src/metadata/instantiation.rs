//! Instantiation of embeddable values from the property values a query produces.
//!
//! Every embeddable type is registered up front with a constructor function that
//! builds an instance from a map of property name to value. Nothing is looked up
//! at runtime beyond the registry itself.

use std::any::Any;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Property values keyed by property name.
pub type PropertyValues = BTreeMap<String, serde_json::Value>;

/// A constructed embeddable instance.
pub type Instance = Box<dyn Any + Send + Sync>;

/// The underlying cause of a failed construction.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Constructor = Box<dyn Fn(&PropertyValues) -> Result<Instance, BoxError> + Send + Sync>;

enum Instantiator {
    /// The type cannot have instances of its own.
    Abstract,
    Constructor(Constructor),
}

/// The registered instantiation strategies, one per embeddable type name.
#[derive(Default)]
pub struct InstantiatorRegistry {
    instantiators: BTreeMap<String, Instantiator>,
}

impl InstantiatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type which is constructed by deserializing its property values.
    /// Properties the type requires but which are absent fail the construction.
    pub fn register<T>(&mut self, type_name: impl Into<String>)
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.register_with(type_name, |values: &PropertyValues| {
            let object = values
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect::<serde_json::Map<String, serde_json::Value>>();
            let instance: T = serde_json::from_value(serde_json::Value::Object(object))?;
            Ok(instance)
        });
    }

    /// Register a type with an explicit constructor function.
    pub fn register_with<T, F>(&mut self, type_name: impl Into<String>, constructor: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&PropertyValues) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let erased: Constructor = Box::new(move |values: &PropertyValues| {
            constructor(values).map(|instance| Box::new(instance) as Instance)
        });
        self.instantiators
            .insert(type_name.into(), Instantiator::Constructor(erased));
    }

    /// Register an abstract type. Instantiating it always fails.
    pub fn register_abstract(&mut self, type_name: impl Into<String>) {
        self.instantiators
            .insert(type_name.into(), Instantiator::Abstract);
    }

    /// Is any strategy registered for this type name.
    pub fn contains(&self, type_name: &str) -> bool {
        self.instantiators.contains_key(type_name)
    }

    /// Build an instance of the named type from the given property values.
    /// On failure no instance, partial or otherwise, is returned.
    pub fn instantiate(
        &self,
        type_name: &str,
        values: &PropertyValues,
    ) -> Result<Instance, InstantiationError> {
        match self.instantiators.get(type_name) {
            None => {
                tracing::warn!("No constructor registered for embeddable: {type_name}");
                Err(InstantiationError::NoConstructor {
                    type_name: type_name.to_string(),
                })
            }
            Some(Instantiator::Abstract) => Err(InstantiationError::Abstract {
                type_name: type_name.to_string(),
            }),
            Some(Instantiator::Constructor(constructor)) => {
                constructor(values).map_err(|source| InstantiationError::Failed {
                    type_name: type_name.to_string(),
                    source,
                })
            }
        }
    }

    /// Build an instance and take it as the concrete type `T`.
    pub fn instantiate_as<T: Any>(
        &self,
        type_name: &str,
        values: &PropertyValues,
    ) -> Result<T, InstantiationError> {
        self.instantiate(type_name, values)?
            .downcast::<T>()
            .map(|instance| *instance)
            .map_err(|_| InstantiationError::UnexpectedType {
                type_name: type_name.to_string(),
            })
    }
}

impl std::fmt::Debug for InstantiatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.instantiators.keys()).finish()
    }
}

/// Instantiation failures. Each carries the name of the type being instantiated.
#[derive(Debug, Error)]
pub enum InstantiationError {
    #[error("cannot instantiate abstract type: {type_name}")]
    Abstract { type_name: String },
    #[error("no constructor registered for embeddable: {type_name}")]
    NoConstructor { type_name: String },
    #[error("could not instantiate embeddable {type_name}: {source}")]
    Failed {
        type_name: String,
        #[source]
        source: BoxError,
    },
    #[error("instance of {type_name} is not of the requested type")]
    UnexpectedType { type_name: String },
}

impl InstantiationError {
    /// The type whose instantiation failed.
    pub fn type_name(&self) -> &str {
        match self {
            InstantiationError::Abstract { type_name }
            | InstantiationError::NoConstructor { type_name }
            | InstantiationError::Failed { type_name, .. }
            | InstantiationError::UnexpectedType { type_name } => type_name,
        }
    }
}
