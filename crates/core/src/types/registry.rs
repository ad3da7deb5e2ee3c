//! Lookup of type descriptions by type reference

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use strum::IntoEnumIterator;

use super::{BaseTypeKind, TypeDescription, TypeRef, BYTES_TYPE_NAME};
use crate::error::{Error, Result};

/// Source of type facts
///
/// Implementations answer for named types by definition name. Arrays are
/// only describable as `u8[]`.
pub trait TypeDescriptionProvider {
    /// Description of the definition behind `type_ref`, if known
    fn describe(&self, type_ref: &TypeRef) -> Option<Arc<TypeDescription>>;

    /// Direct supertypes (base type first, then interfaces) with the
    /// definition's parameters bound to the arguments of `type_ref`
    fn direct_supertypes(&self, type_ref: &TypeRef) -> Vec<TypeRef> {
        let Some(description) = self.describe(type_ref) else {
            return Vec::new();
        };
        let bindings = bind_parameters(&description, type_ref);
        description
            .base_type
            .iter()
            .chain(description.interfaces.iter())
            .map(|ty| ty.substitute(&bindings))
            .collect()
    }

    /// All transitive supertypes in breadth-first order, without duplicates
    fn supertypes(&self, type_ref: &TypeRef) -> Vec<TypeRef> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<TypeRef> = self.direct_supertypes(type_ref).into();
        let mut result = Vec::new();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            queue.extend(self.direct_supertypes(&next));
            result.push(next);
        }
        result
    }

    /// Resolve a bound type into a runtime description, unwrapping `nullable`
    fn runtime_description(&self, type_ref: &TypeRef) -> Result<RuntimeTypeDescription> {
        let (inner, is_nullable) = match type_ref.nullable_inner() {
            Some(inner) => (inner, true),
            None => (type_ref, false),
        };
        let description = self.describe(inner).ok_or_else(|| {
            Error::resolve_type(format!("no type description registered for {inner}"))
        })?;
        Ok(RuntimeTypeDescription {
            type_ref: inner.clone(),
            description,
            is_nullable,
        })
    }
}

/// Positional bindings of a definition's parameters to the arguments of an
/// instantiation; missing arguments stay unbound
pub fn bind_parameters(
    description: &TypeDescription,
    type_ref: &TypeRef,
) -> HashMap<String, TypeRef> {
    description
        .generic_parameters
        .iter()
        .cloned()
        .zip(type_ref.generic_arguments().iter().cloned())
        .collect()
}

/// A type description together with the concrete instantiation it describes
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeTypeDescription {
    /// The bound type, with any `nullable` wrapper removed
    pub type_ref: TypeRef,
    pub description: Arc<TypeDescription>,
    /// Whether the declared type was `nullable<...>`
    pub is_nullable: bool,
}

impl RuntimeTypeDescription {
    pub fn type_name(&self) -> String {
        self.type_ref.to_string()
    }

    /// The declared type, including the nullable wrapper when present
    pub fn declared_type(&self) -> TypeRef {
        if self.is_nullable {
            TypeRef::nullable(self.type_ref.clone())
        } else {
            self.type_ref.clone()
        }
    }
}

/// In-memory type description provider
///
/// Starts out knowing the builtin base types and the top type.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    descriptions: HashMap<String, Arc<TypeDescription>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            descriptions: HashMap::new(),
        };
        for kind in BaseTypeKind::iter() {
            if let Some(name) = kind.type_name() {
                registry.register(TypeDescription::base(name, kind));
            }
        }
        registry.register(object_description());
        registry
    }

    /// Register or replace a description under its definition name
    pub fn register(&mut self, description: TypeDescription) -> &mut Self {
        self.descriptions
            .insert(description.name.clone(), Arc::new(description));
        self
    }

    pub fn with(mut self, description: TypeDescription) -> Self {
        self.register(description);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<TypeDescription>> {
        self.descriptions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptionProvider for TypeRegistry {
    fn describe(&self, type_ref: &TypeRef) -> Option<Arc<TypeDescription>> {
        match type_ref {
            TypeRef::Named { name, .. } => self.get(name),
            TypeRef::Array { element, rank: 1 } if element.name() == Some("u8") => {
                self.get(BYTES_TYPE_NAME)
            }
            TypeRef::Array { .. } | TypeRef::Parameter { .. } => None,
        }
    }
}

fn object_description() -> TypeDescription {
    TypeDescription {
        name: super::OBJECT_TYPE_NAME.to_string(),
        kind: super::TypeKind::Class,
        generic_parameters: Vec::new(),
        is_abstract: false,
        base_type: None,
        interfaces: Vec::new(),
        constructors: Vec::new(),
        properties: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        enum_variants: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeKind;
    use pretty_assertions::assert_eq;

    fn collections_registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescription::builder()
                    .name("IEnumerable")
                    .kind(TypeKind::Interface)
                    .generic_parameters(vec!["T".to_string()])
                    .build()
                    .expect("valid description"),
            )
            .with(
                TypeDescription::builder()
                    .name("List")
                    .kind(TypeKind::Class)
                    .generic_parameters(vec!["T".to_string()])
                    .interfaces(vec![TypeRef::generic(
                        "IEnumerable",
                        vec![TypeRef::parameter("T")],
                    )])
                    .build()
                    .expect("valid description"),
            )
            .with(
                TypeDescription::builder()
                    .name("IntList")
                    .kind(TypeKind::Class)
                    .base_type(Some(TypeRef::generic("List", vec![TypeRef::named("i32")])))
                    .build()
                    .expect("valid description"),
            )
    }

    #[test]
    fn test_base_types_are_preregistered() {
        let registry = TypeRegistry::new();
        let description = registry
            .describe(&TypeRef::named("i32"))
            .expect("i32 is registered");
        assert_eq!(description.base_type_kind(), Some(BaseTypeKind::I32));

        let bytes = registry
            .describe(&TypeRef::array(TypeRef::named("u8"), 1))
            .expect("u8[] is registered");
        assert_eq!(bytes.base_type_kind(), Some(BaseTypeKind::Bytes));
        assert!(registry.describe(&TypeRef::array(TypeRef::named("i32"), 1)).is_none());
    }

    #[test]
    fn test_supertypes_are_bound_transitively() {
        let registry = collections_registry();
        let supertypes = registry.supertypes(&TypeRef::named("IntList"));
        assert_eq!(
            supertypes,
            vec![
                TypeRef::generic("List", vec![TypeRef::named("i32")]),
                TypeRef::generic("IEnumerable", vec![TypeRef::named("i32")]),
            ]
        );
    }

    #[test]
    fn test_runtime_description_unwraps_nullable() {
        let registry = TypeRegistry::new();
        let runtime = registry
            .runtime_description(&TypeRef::nullable(TypeRef::named("i64")))
            .expect("i64 resolves");
        assert!(runtime.is_nullable);
        assert_eq!(runtime.type_ref, TypeRef::named("i64"));
        assert_eq!(runtime.declared_type().to_string(), "nullable<i64>");
    }

    #[test]
    fn test_runtime_description_unknown_type() {
        let registry = TypeRegistry::new();
        let err = registry
            .runtime_description(&TypeRef::named("Unknown"))
            .unwrap_err();
        assert!(matches!(err, Error::ResolveType(_)));
    }
}
