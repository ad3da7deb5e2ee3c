//! Fixture configuration items
//!
//! A [`ConfigurationItem`] is an immutable value: every `with_*` method
//! returns a new item sharing structure with the old one. Items are layered
//! with [`ConfigurationItem::merge`] (system defaults, persisted user
//! configuration, then per-test overrides).

mod document;
mod fixture;
mod member;
mod merge;
mod store;

use im::{HashMap as ImHashMap, OrdMap, Vector};

use crate::fixture_item_id::FixtureItemId;
use crate::types::MethodDescription;

pub use document::{ConfigurationDocument, FixtureDocument, MemberDocument};
pub use fixture::{Callback, CtorSelectionPolicy, FixtureConfiguration, FixtureKind};
pub use member::{ConfigurationSource, CtorMemberConfiguration, MemberConfiguration};
pub use store::ConfigurationStore;

/// Separator of nested member paths (`Vehicle1.Speed`)
pub const MEMBER_PATH_SEPARATOR: char = '.';

/// Resolved or partial configuration of one fixture item
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationItem {
    id: FixtureItemId,
    fixture_configurations: ImHashMap<String, FixtureConfiguration>,
    member_configurations: OrdMap<String, MemberConfiguration>,
    callbacks: OrdMap<String, Vector<Callback>>,
}

impl ConfigurationItem {
    /// Empty configuration for `id`
    pub fn new(id: FixtureItemId) -> Self {
        Self {
            id,
            fixture_configurations: ImHashMap::new(),
            member_configurations: OrdMap::new(),
            callbacks: OrdMap::new(),
        }
    }

    pub fn id(&self) -> &FixtureItemId {
        &self.id
    }

    pub fn with_member(&self, member: MemberConfiguration) -> Self {
        Self {
            member_configurations: self
                .member_configurations
                .update(member.name().to_string(), member),
            ..self.clone()
        }
    }

    pub fn with_members(&self, members: impl IntoIterator<Item = MemberConfiguration>) -> Self {
        members
            .into_iter()
            .fold(self.clone(), |item, member| item.with_member(member))
    }

    pub fn with_ctor(&self, ctor: CtorMemberConfiguration) -> Self {
        self.with_member(MemberConfiguration::Ctor(ctor))
    }

    pub fn with_fixture_configuration(&self, configuration: FixtureConfiguration) -> Self {
        Self {
            fixture_configurations: self
                .fixture_configurations
                .update(configuration.key().to_string(), configuration),
            ..self.clone()
        }
    }

    /// Append a callback to the callbacks registered under `key`
    pub fn with_callback(&self, key: impl Into<String>, callback: Callback) -> Self {
        let key = key.into();
        let mut list = self.callbacks.get(&key).cloned().unwrap_or_default();
        list.push_back(callback);
        Self {
            callbacks: self.callbacks.update(key, list),
            ..self.clone()
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberConfiguration> {
        self.member_configurations.get(name)
    }

    pub fn member_configurations(&self) -> &OrdMap<String, MemberConfiguration> {
        &self.member_configurations
    }

    /// Member configurations other than the constructor
    pub fn variable_member_configurations(
        &self,
    ) -> impl Iterator<Item = (&String, &MemberConfiguration)> {
        self.member_configurations
            .iter()
            .filter(|(key, _)| key.as_str() != MethodDescription::CTOR_NAME)
    }

    pub fn ctor_configuration(&self) -> Option<&CtorMemberConfiguration> {
        self.member(MethodDescription::CTOR_NAME)
            .and_then(MemberConfiguration::as_ctor)
    }

    pub fn fixture_configurations(&self) -> &ImHashMap<String, FixtureConfiguration> {
        &self.fixture_configurations
    }

    pub fn fixture_kind(&self) -> Option<FixtureKind> {
        match self.fixture_configurations.get(FixtureConfiguration::KIND_KEY) {
            Some(FixtureConfiguration::Kind(kind)) => Some(*kind),
            _ => None,
        }
    }

    pub fn ctor_selection(&self) -> Option<CtorSelectionPolicy> {
        match self
            .fixture_configurations
            .get(FixtureConfiguration::CTOR_SELECTION_KEY)
        {
            Some(FixtureConfiguration::CtorSelection(policy)) => Some(*policy),
            _ => None,
        }
    }

    pub fn callbacks(&self, key: &str) -> Vector<Callback> {
        self.callbacks.get(key).cloned().unwrap_or_default()
    }

    pub fn all_callbacks(&self) -> &OrdMap<String, Vector<Callback>> {
        &self.callbacks
    }

    /// Entries addressed to `member` through dotted paths, re-rooted at `child_id`
    ///
    /// `Vehicle1.Speed` in this item becomes `Speed` in the returned item.
    /// Returns `None` when nothing below `member` is configured.
    pub fn nested(&self, member: &str, child_id: &FixtureItemId) -> Option<ConfigurationItem> {
        let prefix = format!("{member}{MEMBER_PATH_SEPARATOR}");
        let mut nested = ConfigurationItem::new(child_id.clone());
        let mut found = false;

        for (key, configuration) in &self.member_configurations {
            if let Some(rest) = key.strip_prefix(&prefix) {
                nested = nested.with_member(configuration.clone().renamed(rest));
                found = true;
            }
        }
        for (key, callbacks) in &self.callbacks {
            if let Some(rest) = key.strip_prefix(&prefix) {
                for callback in callbacks {
                    nested = nested.with_callback(rest, callback.clone());
                }
                found = true;
            }
        }

        found.then_some(nested)
    }

    /// First path segment of every configured key, constructor excluded
    pub fn configured_member_heads(&self) -> Vec<String> {
        let mut heads: Vec<String> = self
            .member_configurations
            .keys()
            .chain(self.callbacks.keys())
            .filter(|key| key.as_str() != MethodDescription::CTOR_NAME)
            .map(|key| {
                key.split(MEMBER_PATH_SEPARATOR)
                    .next()
                    .unwrap_or(key)
                    .to_string()
            })
            .collect();
        heads.sort();
        heads.dedup();
        heads
    }
}
