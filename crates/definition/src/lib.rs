//! Definition trees for fixtura
//!
//! This crate turns a merged configuration item and a type description into
//! an immutable recipe for a fixture object graph:
//!
//! - **Generic matching**: recovering type arguments by aligning an unbound
//!   generic shape against a bound instantiation
//! - **Definition nodes**: base type, class and mock nodes
//! - **Constructor selection** and **system defaults**: pluggable strategies
//! - **Definition tree service**: recursive construction with cycle handling

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod ctor_selector;
pub mod generics;
pub mod nodes;
pub mod service;
pub mod system_defaults;

pub use ctor_selector::{CtorSelector, DefaultCtorSelector};
pub use generics::{GenericTypeMatcher, GenericTypeNode};
pub use nodes::{
    BaseTypeNode, BaseValueDefinition, ClassNode, FieldDefinition, FixtureItemDefinitionNode,
    MethodDefinition, MockNode, ParameterDefinition, PropertyDefinition, ValueDefinition,
};
pub use service::DefinitionTreeService;
pub use system_defaults::{DefaultSystemDefaults, SystemDefaults};
