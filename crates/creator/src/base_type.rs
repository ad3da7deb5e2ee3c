//! Base-type leaves

use fixtura_core::config::UniqueConfig;
use fixtura_core::Result;
use fixtura_definition::{BaseTypeNode, BaseValueDefinition};
use fixtura_unique::UniqueValueContext;

use crate::instance::Instance;

/// Produces values for base-type nodes from configured literals or the
/// unique-value generators
#[derive(Debug, Clone)]
pub struct BaseTypeCreator {
    unique: UniqueValueContext,
}

impl BaseTypeCreator {
    pub fn new(config: &UniqueConfig) -> Self {
        Self {
            unique: UniqueValueContext::new(config),
        }
    }

    pub fn create(&mut self, node: &BaseTypeNode) -> Result<Instance> {
        let value = match &node.value {
            BaseValueDefinition::Raw(value) => value.clone(),
            BaseValueDefinition::Unique => self.unique.next_value(&node.runtime_type.description)?,
        };
        let instance = Instance::Value(value);
        Ok(if node.is_nullable {
            Instance::Nullable(Box::new(instance))
        } else {
            instance
        })
    }

    pub fn unique_values(&mut self) -> &mut UniqueValueContext {
        &mut self.unique
    }
}

impl Default for BaseTypeCreator {
    fn default() -> Self {
        Self::new(&UniqueConfig::default())
    }
}
