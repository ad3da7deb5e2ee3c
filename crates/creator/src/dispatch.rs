//! Creator dispatch
//!
//! [`InstanceCreator`] walks a definition tree depth first and hands every
//! node to the creator for its variant. Named class and mock instances are
//! cached right after construction, before their members are populated,
//! so deferred references deeper in the graph resolve to the same
//! (possibly still incomplete) instance.

use std::rc::Rc;

use fixtura_core::{Error, FixtureItemId, Result};
use fixtura_definition::{ClassNode, FixtureItemDefinitionNode, MockNode, ValueDefinition};
use tracing::{debug, trace};

use crate::base_type::BaseTypeCreator;
use crate::cache::InstanceCache;
use crate::class::FactoryTable;
use crate::instance::Instance;
use crate::mock::{MockMethod, MockObject};

/// Materializes definition trees
pub struct InstanceCreator<'a> {
    base_types: &'a mut BaseTypeCreator,
    factories: &'a FactoryTable,
    cache: &'a mut InstanceCache,
}

impl<'a> InstanceCreator<'a> {
    pub fn new(
        base_types: &'a mut BaseTypeCreator,
        factories: &'a FactoryTable,
        cache: &'a mut InstanceCache,
    ) -> Self {
        Self {
            base_types,
            factories,
            cache,
        }
    }

    /// Instance for `node`
    ///
    /// A named node whose instance is already cached yields the cached
    /// instance.
    ///
    /// # Errors
    ///
    /// `Creation` when a factory or member assignment fails, or when a
    /// deferred reference names a fixture that is not constructed yet.
    pub fn create_instance(&mut self, node: &FixtureItemDefinitionNode) -> Result<Instance> {
        if let Some(cached) = self.cache.get(node.id()) {
            trace!(id = %node.id(), "reusing cached instance");
            return Ok(cached.clone());
        }
        debug!(id = %node.id(), kind = node.kind_name(), "creating instance");

        match node {
            FixtureItemDefinitionNode::BaseType(leaf) => {
                let instance = self.base_types.create(leaf)?;
                self.cache.insert(&leaf.id, instance.clone());
                Ok(instance)
            }
            FixtureItemDefinitionNode::Class(node) => self.create_class(node),
            FixtureItemDefinitionNode::Mock(node) => self.create_mock(node),
        }
    }

    fn create_class(&mut self, node: &ClassNode) -> Result<Instance> {
        let mut arguments = Vec::with_capacity(node.ctor_parameters.len());
        for parameter in &node.ctor_parameters {
            let value = match &parameter.value {
                ValueDefinition::Deferred(target) if self.cache.get(target).is_none() => {
                    return Err(Error::creation(
                        node.id.path(),
                        format!(
                            "constructor parameter {} needs {target}, which is still being \
                             constructed",
                            parameter.name
                        ),
                    ));
                }
                value => self.resolve(&node.id, value)?,
            };
            arguments.push((parameter.name.clone(), value));
        }

        let object = self.factories.construct(node, arguments)?;
        let instance = Instance::Object(object.clone());
        self.cache.insert(&node.id, instance.clone());

        for property in &node.properties {
            let value = self.resolve(&node.id, &property.value)?;
            self.factories.assign(&object, &property.name, value)?;
        }
        for field in &node.fields {
            let value = self.resolve(&node.id, &field.value)?;
            self.factories.assign(&object, &field.name, value)?;
        }
        Ok(instance)
    }

    fn create_mock(&mut self, node: &MockNode) -> Result<Instance> {
        let mock = Rc::new(MockObject::new(
            node.id.clone(),
            node.runtime_type.type_ref.clone(),
        ));
        let instance = Instance::Mock(mock.clone());
        self.cache.insert(&node.id, instance.clone());

        for property in &node.properties {
            let value = self.resolve(&node.id, &property.value)?;
            mock.set_property(&property.name, value);
        }
        for method in &node.methods {
            let return_value = method
                .return_value
                .as_ref()
                .map(|value| self.resolve(&node.id, value))
                .transpose()?;
            mock.set_method(
                &method.key,
                MockMethod {
                    return_value,
                    callbacks: method.callbacks.iter().cloned().collect(),
                },
            );
        }
        Ok(instance)
    }

    fn resolve(&mut self, owner: &FixtureItemId, value: &ValueDefinition) -> Result<Instance> {
        match value {
            ValueDefinition::Null => Ok(Instance::Null),
            ValueDefinition::Node(node) => self.create_instance(node),
            ValueDefinition::Deferred(target) => self.cache.get(target).cloned().ok_or_else(|| {
                Error::creation(
                    owner.path(),
                    format!("deferred reference to {target} has no constructed instance"),
                )
            }),
        }
    }
}
