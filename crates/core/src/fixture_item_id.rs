//! Identity of nodes in a fixture object graph

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use crate::types::TypeRef;

/// Identity of a fixture item
///
/// Named ids denote one shared fixture instance: two ids carrying the same
/// name are equal regardless of type or path. Anonymous ids are equal only
/// when type and root item path agree. A name never changes once assigned;
/// every `with_*` method returns a new id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureItemId {
    name: Option<String>,
    type_ref: TypeRef,
    root_item_path: Option<String>,
}

impl FixtureItemId {
    /// Id of the fixture instance called `name`
    pub fn named(name: impl Into<String>, type_ref: TypeRef) -> Self {
        let name = name.into();
        Self {
            root_item_path: Some(name.clone()),
            name: Some(name),
            type_ref,
        }
    }

    /// Id of an anonymous structural node
    pub fn anonymous(type_ref: TypeRef) -> Self {
        Self {
            name: None,
            type_ref,
            root_item_path: None,
        }
    }

    pub fn with_root_item_path(&self, root_item_path: impl Into<String>) -> Self {
        Self {
            root_item_path: Some(root_item_path.into()),
            ..self.clone()
        }
    }

    pub fn with_type(&self, type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            ..self.clone()
        }
    }

    /// Anonymous id for `member` below this item; the path is extended by one segment
    pub fn child(&self, member: &str, type_ref: TypeRef) -> Self {
        Self::anonymous(type_ref).with_root_item_path(format!("{}.{member}", self.path()))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn root_item_path(&self) -> Option<&str> {
        self.root_item_path.as_deref()
    }

    /// Path used in diagnostics: the root item path, else the name, else the type
    pub fn path(&self) -> String {
        self.root_item_path
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| self.type_ref.short_name())
    }
}

impl PartialEq for FixtureItemId {
    fn eq(&self, other: &Self) -> bool {
        match (&self.name, &other.name) {
            (Some(a), Some(b)) => a == b,
            (None, None) => {
                self.type_ref == other.type_ref && self.root_item_path == other.root_item_path
            }
            _ => false,
        }
    }
}

impl Eq for FixtureItemId {}

impl Hash for FixtureItemId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.name {
            Some(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            None => {
                1u8.hash(state);
                self.type_ref.hash(state);
                self.root_item_path.hash(state);
            }
        }
    }
}

impl Display for FixtureItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}: {}", self.type_ref),
            None => write!(f, "{} ({})", self.path(), self.type_ref),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_named_ids_compare_by_name() {
        let a = FixtureItemId::named("Car1", TypeRef::named("Car"));
        let b = FixtureItemId::named("Car1", TypeRef::named("IVehicle"));
        let c = FixtureItemId::named("Car2", TypeRef::named("Car"));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_anonymous_ids_compare_by_type_and_path() {
        let root = FixtureItemId::named("Garage", TypeRef::named("Garage"));
        let v1 = root.child("Vehicle1", TypeRef::named("IVehicle"));
        let v2 = root.child("Vehicle2", TypeRef::named("IVehicle"));
        assert_ne!(v1, v2);
        assert_eq!(v1.path(), "Garage.Vehicle1");
        assert_eq!(v1, root.child("Vehicle1", TypeRef::named("IVehicle")));
    }

    #[test]
    fn test_named_never_equals_anonymous() {
        let named = FixtureItemId::named("Car", TypeRef::named("Car"));
        let anonymous = FixtureItemId::anonymous(TypeRef::named("Car")).with_root_item_path("Car");
        assert_ne!(named, anonymous);
    }

    #[test]
    fn test_with_type_keeps_name() {
        let id = FixtureItemId::named("Car1", TypeRef::named("IVehicle"));
        let retyped = id.with_type(TypeRef::named("Car"));
        assert_eq!(retyped.name(), Some("Car1"));
        assert_eq!(retyped.type_ref(), &TypeRef::named("Car"));
    }
}
