//! Materialization of fixtura definition trees
//!
//! This crate turns [`FixtureItemDefinitionNode`] trees into live
//! [`Instance`] graphs:
//!
//! - **Instances**: values, records built through registered factories and
//!   call-recording mocks
//! - **Instance cache**: named fixtures, registered before their members are
//!   populated so cyclic references resolve to the same object
//! - **Dispatch**: one creator per definition node variant
//! - **Fixture engine**: the top-level entry point owning type registry,
//!   configuration store, settings and all mutable generator state
//!
//! [`FixtureItemDefinitionNode`]: fixtura_definition::FixtureItemDefinitionNode

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod base_type;
pub mod cache;
pub mod class;
pub mod dispatch;
pub mod fixture;
pub mod instance;
pub mod mock;

pub use base_type::BaseTypeCreator;
pub use cache::InstanceCache;
pub use class::{ClassFactory, FactoryTable};
pub use dispatch::InstanceCreator;
pub use fixture::Fixture;
pub use instance::{FixtureObject, Instance, MockRef, ObjectRef};
pub use mock::{MethodCallback, MockCall, MockMethod, MockObject};
