//! Unique-value generators for fixture base types
//!
//! Every generator hands out values that are pairwise distinct for as long
//! as the value space of its type allows, in a deterministic order. The
//! exceptions are `bool` (always `true`) and `string` (random UUIDs).
//!
//! Generators are plain values: two instances are never synchronized, and
//! distinctness holds per instance. [`UniqueValueContext`] bundles one
//! generator per base type for a fixture engine.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod bit_sequence;
mod context;
mod decimal;
mod enums;
mod floating;
mod integers;
mod text;

pub use bit_sequence::BitSequence;
pub use context::UniqueValueContext;
pub use decimal::DecimalCreator;
pub use enums::EnumCreator;
pub use floating::{F32Creator, F64Creator};
pub use integers::{
    I16Creator, I32Creator, I64Creator, I8Creator, U16Creator, U32Creator, U64Creator, U8Creator,
};
pub use text::{BoolCreator, BytesCreator, CharCreator, StringCreator};

/// A source of fresh values of `T`
pub trait UniqueCreator<T> {
    /// Next value; distinct from every earlier value of this generator
    /// until the value space of `T` is exhausted
    fn next_value(&mut self) -> T;
}
