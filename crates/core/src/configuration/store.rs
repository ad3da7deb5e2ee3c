//! User configuration of named fixtures

use std::collections::HashMap;

use super::ConfigurationItem;
use crate::error::Result;
use crate::fixture_item_id::FixtureItemId;

/// Named fixture id to its user-authored configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigurationStore {
    items: HashMap<FixtureItemId, ConfigurationItem>,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item`, layering it over any configuration already stored for its id
    pub fn register(&mut self, item: ConfigurationItem) -> Result<()> {
        let merged = match self.items.get(item.id()) {
            Some(existing) => existing.merge(&item)?,
            None => item,
        };
        self.items.insert(merged.id().clone(), merged);
        Ok(())
    }

    pub fn get(&self, id: &FixtureItemId) -> Option<&ConfigurationItem> {
        self.items.get(id)
    }

    /// Layer every item of `other` over this store
    pub fn extend(&mut self, other: ConfigurationStore) -> Result<()> {
        for item in other.items.into_values() {
            self.register(item)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
