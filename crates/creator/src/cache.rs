//! Named fixture instances

use std::collections::HashMap;

use fixtura_core::FixtureItemId;
use tracing::trace;

use crate::instance::Instance;

/// Materialized named fixtures, keyed by fixture name
///
/// Anonymous ids are never cached.
#[derive(Debug, Default)]
pub struct InstanceCache {
    instances: HashMap<String, Instance>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &FixtureItemId) -> Option<&Instance> {
        id.name().and_then(|name| self.get_by_name(name))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Instance> {
        self.instances.get(name)
    }

    /// Cache `instance` under `id`'s name; returns `false` for anonymous ids
    pub fn insert(&mut self, id: &FixtureItemId, instance: Instance) -> bool {
        let Some(name) = id.name() else {
            return false;
        };
        trace!(name, "caching named instance");
        self.instances.insert(name.to_string(), instance);
        true
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }
}
