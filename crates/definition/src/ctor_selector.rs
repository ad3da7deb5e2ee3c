//! Constructor selection

use std::collections::HashMap;

use fixtura_core::{
    CtorMemberConfiguration, CtorSelectionPolicy, Error, MethodDescription, Result,
    TypeDescription, TypeRef,
};
use tracing::{debug, warn};

/// Picks the constructor a class fixture is built with
pub trait CtorSelector {
    /// Choose among `description`'s constructors
    ///
    /// `bindings` binds the type's generic parameters for this
    /// instantiation, so requested overloads may name either declared or
    /// bound parameter types.
    fn select(
        &self,
        description: &TypeDescription,
        bindings: &HashMap<String, TypeRef>,
        configuration: Option<&CtorMemberConfiguration>,
        policy: CtorSelectionPolicy,
    ) -> Result<MethodDescription>;
}

/// Requested overload first, then the policy among the constructors that
/// accept every configured parameter; ties go to the first declared one
///
/// A type without declared constructors gets an implicit parameterless one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCtorSelector;

impl CtorSelector for DefaultCtorSelector {
    fn select(
        &self,
        description: &TypeDescription,
        bindings: &HashMap<String, TypeRef>,
        configuration: Option<&CtorMemberConfiguration>,
        policy: CtorSelectionPolicy,
    ) -> Result<MethodDescription> {
        if description.constructors.is_empty() {
            if let Some(name) = configuration.and_then(|c| c.parameters.keys().next()) {
                return Err(Error::invalid_configuration(
                    &description.name,
                    format!(
                        "constructor parameter {name} is configured but the type declares no \
                         constructor"
                    ),
                ));
            }
            return Ok(MethodDescription::constructor(
                std::iter::empty::<(String, TypeRef)>(),
            ));
        }

        if let Some(requested) = configuration.filter(|c| c.has_overload_request()) {
            let requested: Vec<TypeRef> = requested.parameter_types.iter().cloned().collect();
            return description
                .constructors
                .iter()
                .find(|ctor| {
                    let declared = ctor.parameter_types();
                    let bound: Vec<TypeRef> =
                        declared.iter().map(|t| t.substitute(bindings)).collect();
                    declared == requested || bound == requested
                })
                .cloned()
                .ok_or_else(|| {
                    Error::invalid_configuration(
                        &description.name,
                        format!("no constructor takes ({})", display_types(&requested)),
                    )
                });
        }

        let configured: Vec<&String> = configuration
            .map(|c| c.parameters.keys().collect())
            .unwrap_or_default();
        let candidates: Vec<&MethodDescription> = description
            .constructors
            .iter()
            .filter(|ctor| {
                configured
                    .iter()
                    .all(|name| ctor.parameters.iter().any(|p| &&p.name == name))
            })
            .collect();

        let chosen = match policy {
            CtorSelectionPolicy::MostParameters => candidates
                .iter()
                .rev()
                .max_by_key(|ctor| ctor.parameters.len()),
            CtorSelectionPolicy::FewestParameters => {
                candidates.iter().min_by_key(|ctor| ctor.parameters.len())
            }
        }
        .copied()
        .ok_or_else(|| {
            Error::invalid_configuration(
                &description.name,
                format!(
                    "no constructor accepts the configured parameters {}",
                    configured
                        .iter()
                        .map(|n| n.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
        })?;

        let ties = candidates
            .iter()
            .filter(|ctor| ctor.parameters.len() == chosen.parameters.len())
            .count();
        if ties > 1 {
            warn!(
                type_name = %description.name,
                parameters = chosen.parameters.len(),
                "ambiguous constructor selection, using the first declared"
            );
        }

        debug!(
            type_name = %description.name,
            %policy,
            parameters = %display_types(&chosen.parameter_types()),
            "selected constructor"
        );
        Ok(chosen.clone())
    }
}

fn display_types(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
