//! Construction of class fixtures through registered factories

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use fixtura_core::{Error, Result};
use fixtura_definition::ClassNode;
use tracing::debug;

use crate::instance::{FixtureObject, Instance, ObjectRef};

/// Builds the native value of one class from its constructor arguments
///
/// Closures taking the ordered `(parameter, instance)` list implement this
/// trait; implement it directly to also receive member assignments.
pub trait ClassFactory {
    fn construct(&self, arguments: &[(String, Instance)]) -> anyhow::Result<Box<dyn Any>>;

    /// Apply an assigned property or field to the constructed value
    fn set_member(
        &self,
        _target: &mut dyn Any,
        _member: &str,
        _value: &Instance,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<F> ClassFactory for F
where
    F: Fn(&[(String, Instance)]) -> anyhow::Result<Box<dyn Any>>,
{
    fn construct(&self, arguments: &[(String, Instance)]) -> anyhow::Result<Box<dyn Any>> {
        self(arguments)
    }
}

/// Class factories keyed by type definition name
///
/// Classes without a factory materialize as dynamic records of their
/// constructor arguments and members.
#[derive(Default)]
pub struct FactoryTable {
    factories: HashMap<String, Box<dyn ClassFactory>>,
}

impl FactoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, type_name: impl Into<String>, factory: impl ClassFactory + 'static) {
        self.factories.insert(type_name.into(), Box::new(factory));
    }

    pub fn get(&self, type_name: &str) -> Option<&dyn ClassFactory> {
        self.factories.get(type_name).map(|factory| factory.as_ref())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Invoke the selected constructor of `node`
    ///
    /// # Errors
    ///
    /// Returns `Creation` when the registered factory fails.
    pub fn construct(
        &self,
        node: &ClassNode,
        arguments: Vec<(String, Instance)>,
    ) -> Result<ObjectRef> {
        let type_name = &node.runtime_type.description.name;
        let payload = match self.get(type_name) {
            Some(factory) => Some(
                factory
                    .construct(&arguments)
                    .map_err(|e| Error::creation(node.id.path(), format!("{e:#}")))?,
            ),
            None => {
                debug!(
                    id = %node.id,
                    type_name = %type_name,
                    "no factory registered, building a record"
                );
                None
            }
        };
        Ok(Rc::new(FixtureObject::new(
            node.id.clone(),
            node.runtime_type.type_ref.clone(),
            arguments,
            payload,
        )))
    }

    /// Assign a property or field of a constructed object
    ///
    /// # Errors
    ///
    /// Returns `Creation` when the factory rejects the assignment.
    pub fn assign(&self, object: &FixtureObject, member: &str, value: Instance) -> Result<()> {
        let type_name = object.type_ref().name().unwrap_or_default().to_string();
        if let Some(factory) = self.get(&type_name) {
            if let Some(target) = object.payload_mut().as_mut() {
                factory
                    .set_member(&mut **target, member, &value)
                    .map_err(|e| {
                        Error::creation(object.id().path(), format!("setting {member}: {e:#}"))
                    })?;
            }
        }
        object.set_member(member, value);
        Ok(())
    }
}

impl fmt::Debug for FactoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("FactoryTable").field("factories", &names).finish()
    }
}
