//! The fixture engine
//!
//! A [`Fixture`] owns everything one test process needs to build fixtures:
//! the type registry, the user configuration store, the engine settings,
//! registered class factories, the named instance cache and the unique-value
//! generators. Separate engines share no state.

use std::path::Path;

use fixtura_core::{
    Config, ConfigurationDocument, ConfigurationItem, ConfigurationSource, ConfigurationStore,
    FixtureItemId, Result, TypeDescriptionProvider, TypeRef, TypeRegistry, Value,
};
use fixtura_definition::{DefinitionTreeService, FixtureItemDefinitionNode};
use tracing::{debug, info};

use crate::base_type::BaseTypeCreator;
use crate::cache::InstanceCache;
use crate::class::{ClassFactory, FactoryTable};
use crate::dispatch::InstanceCreator;
use crate::instance::Instance;

/// Builds fixture instances from type descriptions and configuration
#[derive(Debug)]
pub struct Fixture {
    registry: TypeRegistry,
    store: ConfigurationStore,
    config: Config,
    factories: FactoryTable,
    cache: InstanceCache,
    base_types: BaseTypeCreator,
}

impl Fixture {
    /// Engine over `registry` with validated `config`
    pub fn new(registry: TypeRegistry, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base_types: BaseTypeCreator::new(&config.unique),
            registry,
            store: ConfigurationStore::new(),
            config,
            factories: FactoryTable::new(),
            cache: InstanceCache::new(),
        })
    }

    /// Engine with settings loaded from `config_path`, or the global
    /// settings file, plus `FIXTURA_*` environment overrides
    pub fn load(registry: TypeRegistry, config_path: Option<&Path>) -> Result<Self> {
        Self::new(registry, Config::load(config_path)?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ConfigurationStore {
        &self.store
    }

    /// Layer a user configuration item over the stored configuration of its id
    pub fn register_configuration(&mut self, item: ConfigurationItem) -> Result<()> {
        self.store.register(item)
    }

    /// Load a persisted configuration document (TOML, or JSON by extension)
    pub fn load_configuration(&mut self, path: &Path) -> Result<()> {
        let source = ConfigurationSource::File {
            path: path.display().to_string(),
        };
        let store = ConfigurationDocument::from_file(path)?.into_store(&source)?;
        info!(path = %path.display(), fixtures = store.len(), "loaded fixture configuration");
        self.store.extend(store)
    }

    pub fn register_factory(
        &mut self,
        type_name: impl Into<String>,
        factory: impl ClassFactory + 'static,
    ) {
        self.factories.register(type_name, factory);
    }

    /// Definition tree for `id`: its stored configuration with `overrides`
    /// layered on top
    pub fn definition(
        &self,
        id: &FixtureItemId,
        overrides: Option<&ConfigurationItem>,
    ) -> Result<FixtureItemDefinitionNode> {
        let stored = self
            .store
            .get(id)
            .cloned()
            .unwrap_or_else(|| ConfigurationItem::new(id.clone()));
        let configuration = stored.merge_optional(overrides)?;

        DefinitionTreeService::new(&self.registry, &self.store, self.config.definition.clone())
            .create_root(id, &configuration)
    }

    /// Build and materialize the fixture `id`
    ///
    /// Named fixtures already materialized by this engine are returned from
    /// the instance cache.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when the configuration does not fit the type,
    /// `ResolveType` for undescribed types and `Creation` when a factory or
    /// member assignment fails.
    pub fn build(
        &mut self,
        id: &FixtureItemId,
        overrides: Option<&ConfigurationItem>,
    ) -> Result<Instance> {
        let definition = self.definition(id, overrides)?;
        debug!(id = %id, kind = definition.kind_name(), "materializing fixture");
        InstanceCreator::new(&mut self.base_types, &self.factories, &mut self.cache)
            .create_instance(&definition)
    }

    /// Next unique value of the base type `type_ref`, outside any fixture
    pub fn next_unique(&mut self, type_ref: &TypeRef) -> Result<Value> {
        let runtime_type = self.registry.runtime_description(type_ref)?;
        self.base_types
            .unique_values()
            .next_value(&runtime_type.description)
    }

    pub fn cached(&self, name: &str) -> Option<&Instance> {
        self.cache.get_by_name(name)
    }

    /// Forget every materialized named fixture
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
