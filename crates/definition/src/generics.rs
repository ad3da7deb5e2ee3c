//! Generic parameter matching
//!
//! Aligns an unbound generic shape (`List<List<T>>`) against a bound
//! instantiation (`List<List<i32>>`) and records, for every type parameter
//! leaf, the concrete type found at the same position.

use std::collections::HashMap;

use fixtura_core::{GenericMatchError, TypeDescriptionProvider, TypeRef};
use tracing::trace;

/// Structural alignment of an unbound type against a bound one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericTypeNode {
    /// A non-parameter type; one child per generic argument or array element
    Node {
        type_ref: TypeRef,
        children: Vec<GenericTypeNode>,
    },
    /// A type parameter and the concrete type bound to it
    GenericParameter { name: String, bound: TypeRef },
}

impl GenericTypeNode {
    /// Parameter bindings in pre-order depth-first order
    pub fn flatten(&self) -> Vec<(String, TypeRef)> {
        let mut bindings = Vec::new();
        self.collect(&mut bindings);
        bindings
    }

    fn collect(&self, bindings: &mut Vec<(String, TypeRef)>) {
        match self {
            GenericTypeNode::GenericParameter { name, bound } => {
                bindings.push((name.clone(), bound.clone()));
            }
            GenericTypeNode::Node { children, .. } => {
                for child in children {
                    child.collect(bindings);
                }
            }
        }
    }

    /// Parameter name to concrete type; the first occurrence of a parameter wins
    pub fn bindings(&self) -> HashMap<String, TypeRef> {
        let mut map = HashMap::new();
        for (name, bound) in self.flatten() {
            map.entry(name).or_insert(bound);
        }
        map
    }
}

/// Builds [`GenericTypeNode`] trees, searching supertypes through a
/// [`TypeDescriptionProvider`] when the definitions differ
pub struct GenericTypeMatcher<'a> {
    provider: &'a dyn TypeDescriptionProvider,
}

impl<'a> GenericTypeMatcher<'a> {
    pub fn new(provider: &'a dyn TypeDescriptionProvider) -> Self {
        Self { provider }
    }

    /// Align `unbound` against `bound`
    ///
    /// # Errors
    ///
    /// `NotAssignable` when neither `bound` nor any of its supertypes shares
    /// `unbound`'s generic definition, `ArityMismatch` when they share it but
    /// disagree on argument count or array rank.
    pub fn build(
        &self,
        unbound: &TypeRef,
        bound: &TypeRef,
    ) -> Result<GenericTypeNode, GenericMatchError> {
        trace!(%unbound, %bound, "matching generic shape");

        if let TypeRef::Parameter { name } = unbound {
            return Ok(GenericTypeNode::GenericParameter {
                name: name.clone(),
                bound: bound.clone(),
            });
        }

        if bound.is_object() {
            let children = unbound
                .generic_arguments()
                .iter()
                .map(|argument| self.build(argument, bound))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(GenericTypeNode::Node {
                type_ref: unbound.clone(),
                children,
            });
        }

        let effective = self.effective_bound(unbound, bound)?;
        let unbound_arguments = unbound.generic_arguments();
        let bound_arguments = effective.generic_arguments();
        if unbound_arguments.len() != bound_arguments.len() {
            return Err(arity_mismatch(unbound, bound));
        }

        let children = unbound_arguments
            .iter()
            .zip(bound_arguments)
            .map(|(u, b)| self.build(u, b))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GenericTypeNode::Node {
            type_ref: unbound.clone(),
            children,
        })
    }

    /// Whether a value of type `source` can be stored in a member of type `target`
    ///
    /// The top type accepts everything, and a `source` of the top type is
    /// accepted everywhere since its instantiation is unknown.
    pub fn is_assignable(&self, target: &TypeRef, source: &TypeRef) -> bool {
        target == source || target.is_object() || self.build(target, source).is_ok()
    }

    /// `bound`, or the supertype of `bound` with `unbound`'s generic definition
    fn effective_bound(
        &self,
        unbound: &TypeRef,
        bound: &TypeRef,
    ) -> Result<TypeRef, GenericMatchError> {
        match (unbound, bound) {
            (TypeRef::Array { rank, .. }, TypeRef::Array { rank: bound_rank, .. }) => {
                if rank == bound_rank {
                    Ok(bound.clone())
                } else {
                    Err(arity_mismatch(unbound, bound))
                }
            }
            (TypeRef::Array { .. }, _) => Err(not_assignable(unbound, bound)),
            (TypeRef::Named { name, .. }, _) => {
                if bound.name() == Some(name.as_str()) {
                    return Ok(bound.clone());
                }
                if let Some(supertype) = self
                    .provider
                    .supertypes(bound)
                    .into_iter()
                    .find(|candidate| candidate.name() == Some(name.as_str()))
                {
                    return Ok(supertype);
                }
                // a plain value converts into its nullable wrapper
                if unbound.nullable_inner().is_some() {
                    return Ok(TypeRef::nullable(bound.clone()));
                }
                Err(not_assignable(unbound, bound))
            }
            (TypeRef::Parameter { .. }, _) => Ok(bound.clone()),
        }
    }
}

fn not_assignable(unbound: &TypeRef, bound: &TypeRef) -> GenericMatchError {
    GenericMatchError::NotAssignable {
        unbound: unbound.to_string(),
        bound: bound.to_string(),
    }
}

fn arity_mismatch(unbound: &TypeRef, bound: &TypeRef) -> GenericMatchError {
    GenericMatchError::ArityMismatch {
        unbound: unbound.to_string(),
        bound: bound.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtura_core::{TypeDescription, TypeKind, TypeRegistry};
    use pretty_assertions::assert_eq;

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescription::builder()
                    .name("List")
                    .kind(TypeKind::Class)
                    .generic_parameters(vec!["T".to_string()])
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
    fn test_parameter_maps_directly() {
        let registry = registry();
        let matcher = GenericTypeMatcher::new(&registry);
        let node = matcher
            .build(&TypeRef::parameter("T"), &TypeRef::named("Car"))
            .expect("matches");
        assert_eq!(
            node,
            GenericTypeNode::GenericParameter {
                name: "T".into(),
                bound: TypeRef::named("Car")
            }
        );
    }

    #[test]
    fn test_object_binds_every_leaf_to_object() {
        let registry = registry();
        let matcher = GenericTypeMatcher::new(&registry);
        let unbound = TypeRef::generic(
            "Map",
            vec![TypeRef::parameter("K"), TypeRef::array(TypeRef::parameter("V"), 1)],
        );
        let node = matcher.build(&unbound, &TypeRef::object()).expect("matches");
        assert_eq!(
            node.flatten(),
            vec![
                ("K".to_string(), TypeRef::object()),
                ("V".to_string(), TypeRef::object())
            ]
        );
    }

    #[test]
    fn test_supertype_search() {
        let registry = registry();
        let matcher = GenericTypeMatcher::new(&registry);
        let node = matcher
            .build(
                &TypeRef::generic("List", vec![TypeRef::parameter("T")]),
                &TypeRef::named("IntList"),
            )
            .expect("IntList is a List<i32>");
        assert_eq!(node.bindings().get("T"), Some(&TypeRef::named("i32")));
    }

    #[test]
    fn test_array_rank_must_match() {
        let registry = registry();
        let matcher = GenericTypeMatcher::new(&registry);
        let unbound = TypeRef::array(TypeRef::parameter("T"), 2);

        let node = matcher
            .build(&unbound, &TypeRef::array(TypeRef::named("f64"), 2))
            .expect("same rank");
        assert_eq!(node.bindings().get("T"), Some(&TypeRef::named("f64")));

        let err = matcher
            .build(&unbound, &TypeRef::array(TypeRef::named("f64"), 1))
            .expect_err("rank differs");
        assert!(matches!(err, GenericMatchError::ArityMismatch { .. }));
        assert_eq!(err.to_string(), "type f64[] does not match T[,]");
    }

    #[test]
    fn test_unrelated_types_are_not_assignable() {
        let registry = registry();
        let matcher = GenericTypeMatcher::new(&registry);
        let err = matcher
            .build(
                &TypeRef::generic("List", vec![TypeRef::parameter("T")]),
                &TypeRef::named("string"),
            )
            .expect_err("string is no list");
        assert_eq!(
            err,
            GenericMatchError::NotAssignable {
                unbound: "List<T>".into(),
                bound: "string".into()
            }
        );
    }

    #[test]
    fn test_argument_count_mismatch() {
        let registry = registry();
        let matcher = GenericTypeMatcher::new(&registry);
        let err = matcher
            .build(
                &TypeRef::generic("Pair", vec![TypeRef::parameter("A"), TypeRef::parameter("B")]),
                &TypeRef::generic("Pair", vec![TypeRef::named("i32")]),
            )
            .expect_err("arity differs");
        assert!(matches!(err, GenericMatchError::ArityMismatch { .. }));
    }

    #[test]
    fn test_assignability() {
        let registry = registry();
        let matcher = GenericTypeMatcher::new(&registry);
        let list_of_int = TypeRef::generic("List", vec![TypeRef::named("i32")]);
        assert!(matcher.is_assignable(&list_of_int, &TypeRef::named("IntList")));
        assert!(matcher.is_assignable(&TypeRef::object(), &TypeRef::named("IntList")));
        assert!(matcher.is_assignable(
            &TypeRef::nullable(TypeRef::named("i32")),
            &TypeRef::named("i32")
        ));
        assert!(!matcher.is_assignable(
            &TypeRef::generic("List", vec![TypeRef::named("string")]),
            &TypeRef::named("IntList")
        ));
    }
}
