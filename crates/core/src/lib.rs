//! Core types for the fixtura test-fixture engine
//!
//! This crate provides the foundational abstractions used by the other
//! fixtura crates, including:
//!
//! - **Types**: structural type references and read-only type descriptions
//! - **Values**: literal primitive values
//! - **Fixture ids**: identity of nodes in a fixture object graph
//! - **Configuration items**: layered per-fixture configuration and its merge engine
//! - **Settings**: engine settings management
//! - **Error handling**: Unified error types
//!

pub mod config;
pub mod configuration;
pub mod error;
pub mod fixture_item_id;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use config::{Config, DefinitionConfig, UniqueConfig};
pub use configuration::{
    Callback, ConfigurationDocument, ConfigurationItem, ConfigurationSource, ConfigurationStore,
    CtorMemberConfiguration, CtorSelectionPolicy, FixtureConfiguration, FixtureKind,
    MemberConfiguration,
};
pub use error::{Error, GenericMatchError, Result, ResultExt};
pub use fixture_item_id::FixtureItemId;
pub use types::{
    BaseTypeKind, FieldDescription, MethodDescription, ParameterDescription, PropertyDescription,
    RuntimeTypeDescription, TypeDescription, TypeDescriptionProvider, TypeKind, TypeRef,
    TypeRegistry,
};
pub use value::{Decimal, Value};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::configuration::{ConfigurationItem, MemberConfiguration};
    pub use crate::error::{Result, ResultExt};
    pub use crate::fixture_item_id::FixtureItemId;
    pub use crate::types::{TypeDescriptionProvider, TypeRef};
}
