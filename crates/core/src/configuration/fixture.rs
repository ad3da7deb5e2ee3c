//! Kind-level fixture settings and opaque callbacks

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// How a class-typed fixture is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FixtureKind {
    /// A dynamic test double
    Mock,
    /// A real instance built through a constructor
    Concrete,
}

/// Default constructor choice when no overload is configured
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CtorSelectionPolicy {
    #[default]
    MostParameters,
    FewestParameters,
}

/// A kind-level setting of one fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureConfiguration {
    Kind(FixtureKind),
    CtorSelection(CtorSelectionPolicy),
}

impl FixtureConfiguration {
    pub const KIND_KEY: &'static str = "kind";
    pub const CTOR_SELECTION_KEY: &'static str = "ctor_selection";

    /// Key under which this setting is stored; one setting per key
    pub fn key(&self) -> &'static str {
        match self {
            FixtureConfiguration::Kind(_) => Self::KIND_KEY,
            FixtureConfiguration::CtorSelection(_) => Self::CTOR_SELECTION_KEY,
        }
    }
}

/// Opaque callback attached to a method member
///
/// The configuration layer never looks inside; creators downcast to the
/// callback type they understand. Equality is identity.
#[derive(Clone)]
pub struct Callback {
    inner: Arc<dyn Any + Send + Sync>,
}

impl Callback {
    pub fn new<T: Any + Send + Sync>(callback: T) -> Self {
        Self {
            inner: Arc::new(callback),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_configuration_keys() {
        assert_eq!(FixtureConfiguration::Kind(FixtureKind::Mock).key(), "kind");
        assert_eq!(
            FixtureConfiguration::CtorSelection(CtorSelectionPolicy::FewestParameters).key(),
            "ctor_selection"
        );
    }

    #[test]
    fn test_policy_parses_snake_case() {
        assert_eq!(
            "fewest_parameters".parse::<CtorSelectionPolicy>().ok(),
            Some(CtorSelectionPolicy::FewestParameters)
        );
        assert_eq!(FixtureKind::Concrete.to_string(), "concrete");
    }

    #[test]
    fn test_callback_identity() {
        let a = Callback::new(5u32);
        let b = a.clone();
        let c = Callback::new(5u32);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_ref::<u32>(), Some(&5));
        assert_eq!(a.downcast_ref::<i64>(), None);
    }
}
