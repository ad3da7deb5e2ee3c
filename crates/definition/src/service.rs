//! Definition tree construction
//!
//! [`DefinitionTreeService`] turns a runtime type, a fixture id and a merged
//! configuration item into an immutable [`FixtureItemDefinitionNode`] tree.
//! Members nobody configured receive system defaults; nested fixtures are
//! built recursively with their stored configuration, overridden by dotted
//! entries of the parent.
//!
//! Named fixtures are defined once per pass: any further reference to a
//! named id, including a cyclic one, becomes [`ValueDefinition::Deferred`].
//! Anonymous nesting is bounded by `definition.max_depth`.

use std::collections::{HashMap, HashSet};

use fixtura_core::config::DefinitionConfig;
use fixtura_core::{
    BaseTypeKind, ConfigurationItem, ConfigurationStore, Error, FixtureConfiguration,
    FixtureItemId, FixtureKind, GenericMatchError, MemberConfiguration, Result,
    RuntimeTypeDescription, TypeDescription, TypeDescriptionProvider, TypeKind, TypeRef, Value,
};
use tracing::{debug, trace};

use crate::ctor_selector::{CtorSelector, DefaultCtorSelector};
use crate::generics::GenericTypeMatcher;
use crate::nodes::{
    BaseTypeNode, BaseValueDefinition, ClassNode, FieldDefinition, FixtureItemDefinitionNode,
    MethodDefinition, MockNode, ParameterDefinition, PropertyDefinition, ValueDefinition,
};
use crate::system_defaults::{DefaultSystemDefaults, SystemDefaults};

/// How a node is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeShape {
    BaseType,
    Class,
    Mock,
}

/// Per-pass bookkeeping
#[derive(Debug, Default)]
struct BuildState {
    /// Ids under construction, outermost first
    stack: Vec<FixtureItemId>,
    /// Named ids already defined in this pass
    defined: HashSet<FixtureItemId>,
}

/// Builds definition trees from type descriptions and configuration items
pub struct DefinitionTreeService<'a> {
    provider: &'a dyn TypeDescriptionProvider,
    store: &'a ConfigurationStore,
    settings: DefinitionConfig,
    ctor_selector: Box<dyn CtorSelector + 'a>,
    system_defaults: Box<dyn SystemDefaults + 'a>,
}

impl<'a> DefinitionTreeService<'a> {
    pub fn new(
        provider: &'a dyn TypeDescriptionProvider,
        store: &'a ConfigurationStore,
        settings: DefinitionConfig,
    ) -> Self {
        Self {
            provider,
            store,
            settings,
            ctor_selector: Box::new(DefaultCtorSelector),
            system_defaults: Box::new(DefaultSystemDefaults),
        }
    }

    pub fn with_ctor_selector(mut self, selector: impl CtorSelector + 'a) -> Self {
        self.ctor_selector = Box::new(selector);
        self
    }

    pub fn with_system_defaults(mut self, defaults: impl SystemDefaults + 'a) -> Self {
        self.system_defaults = Box::new(defaults);
        self
    }

    /// Definition tree of `id`'s own type
    pub fn create_root(
        &self,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<FixtureItemDefinitionNode> {
        let runtime_type = self.provider.runtime_description(id.type_ref())?;
        self.create_node(&runtime_type, id, configuration)
    }

    /// Definition tree for `runtime_type`, classified by its description and
    /// the configured fixture kind
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when the configuration cannot be reconciled
    /// with the type, including unmatched generic bindings and anonymous
    /// nesting beyond the maximum depth. `ResolveType` when a referenced type
    /// has no description.
    pub fn create_node(
        &self,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<FixtureItemDefinitionNode> {
        self.build_node(&mut BuildState::default(), runtime_type, id, configuration)
    }

    pub fn create_base_type_node(
        &self,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<BaseTypeNode> {
        if !runtime_type.description.is_base_type() {
            return Err(invalid(
                id,
                format!("{} is not a base type", runtime_type.type_name()),
            ));
        }
        self.base_type_node(runtime_type, id, configuration)
    }

    pub fn create_class_node(
        &self,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<ClassNode> {
        let configuration = configuration
            .with_fixture_configuration(FixtureConfiguration::Kind(FixtureKind::Concrete));
        if self.classify(runtime_type, id, &configuration)? != NodeShape::Class {
            return Err(invalid(
                id,
                format!("{} cannot be built as a class", runtime_type.type_name()),
            ));
        }
        let mut state = BuildState::default();
        self.scoped(&mut state, id, |state| {
            self.class_node(state, runtime_type, id, &configuration)
        })
    }

    pub fn create_mock_node(
        &self,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<MockNode> {
        let configuration = configuration
            .with_fixture_configuration(FixtureConfiguration::Kind(FixtureKind::Mock));
        if self.classify(runtime_type, id, &configuration)? != NodeShape::Mock {
            return Err(invalid(
                id,
                format!("{} cannot be mocked", runtime_type.type_name()),
            ));
        }
        let mut state = BuildState::default();
        self.scoped(&mut state, id, |state| {
            self.mock_node(state, runtime_type, id, &configuration)
        })
    }

    fn build_node(
        &self,
        state: &mut BuildState,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<FixtureItemDefinitionNode> {
        let shape = self.classify(runtime_type, id, configuration)?;
        debug!(
            id = %id,
            type_name = %runtime_type.type_name(),
            ?shape,
            depth = state.stack.len(),
            "building definition node"
        );

        self.scoped(state, id, |state| match shape {
            NodeShape::BaseType => self
                .base_type_node(runtime_type, id, configuration)
                .map(FixtureItemDefinitionNode::BaseType),
            NodeShape::Class => self
                .class_node(state, runtime_type, id, configuration)
                .map(FixtureItemDefinitionNode::Class),
            NodeShape::Mock => self
                .mock_node(state, runtime_type, id, configuration)
                .map(FixtureItemDefinitionNode::Mock),
        })
    }

    /// Run `build` with `id` pushed on the construction stack
    fn scoped<T>(
        &self,
        state: &mut BuildState,
        id: &FixtureItemId,
        build: impl FnOnce(&mut BuildState) -> Result<T>,
    ) -> Result<T> {
        if state.stack.len() >= self.settings.max_depth {
            let outermost = state
                .stack
                .first()
                .map(FixtureItemId::path)
                .unwrap_or_default();
            return Err(invalid(
                id,
                format!(
                    "fixture nesting below {outermost} exceeds the maximum depth of {}",
                    self.settings.max_depth
                ),
            ));
        }
        state.stack.push(id.clone());
        if id.is_named() {
            state.defined.insert(id.clone());
        }
        let result = build(state);
        state.stack.pop();
        result
    }

    fn classify(
        &self,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<NodeShape> {
        let description = &runtime_type.description;
        match (description.kind, configuration.fixture_kind()) {
            (TypeKind::BaseType(_), Some(FixtureKind::Mock)) => Err(invalid(
                id,
                format!("base type {} cannot be mocked", description.name),
            )),
            (TypeKind::BaseType(_), _) => Ok(NodeShape::BaseType),
            (TypeKind::Interface, Some(FixtureKind::Concrete)) => Err(invalid(
                id,
                format!("interface {} cannot be built concretely", description.name),
            )),
            (TypeKind::Interface, _) => Ok(NodeShape::Mock),
            (TypeKind::Class | TypeKind::Struct, Some(FixtureKind::Mock)) => Ok(NodeShape::Mock),
            (TypeKind::Class | TypeKind::Struct, Some(FixtureKind::Concrete))
                if description.is_abstract =>
            {
                Err(invalid(
                    id,
                    format!("abstract class {} cannot be built concretely", description.name),
                ))
            }
            (TypeKind::Class | TypeKind::Struct, Some(FixtureKind::Concrete)) => {
                Ok(NodeShape::Class)
            }
            (TypeKind::Class | TypeKind::Struct, None) if description.is_abstract => {
                Ok(NodeShape::Mock)
            }
            (TypeKind::Class | TypeKind::Struct, None) => Ok(NodeShape::Class),
        }
    }

    fn base_type_node(
        &self,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<BaseTypeNode> {
        if let Some(key) = configuration
            .member_configurations()
            .keys()
            .chain(configuration.all_callbacks().keys())
            .next()
        {
            return Err(invalid(
                id,
                format!("base type {} has no member {key}", runtime_type.type_name()),
            ));
        }
        Ok(BaseTypeNode {
            id: id.clone(),
            runtime_type: runtime_type.clone(),
            value: BaseValueDefinition::Unique,
            is_nullable: runtime_type.is_nullable,
        })
    }

    fn class_node(
        &self,
        state: &mut BuildState,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<ClassNode> {
        let description = &runtime_type.description;
        let bindings = self.owner_bindings(runtime_type, id)?;
        validate_class_members(id, description, configuration)?;

        let ctor_configuration = configuration.ctor_configuration();
        let policy = configuration
            .ctor_selection()
            .unwrap_or(self.settings.ctor_selection);
        let ctor = self
            .ctor_selector
            .select(description, &bindings, ctor_configuration, policy)
            .map_err(|e| at_path(id, e))?;

        if let Some(ctor_configuration) = ctor_configuration {
            if let Some(unknown) = ctor_configuration
                .parameters
                .keys()
                .find(|name| !ctor.parameters.iter().any(|p| &&p.name == name))
            {
                return Err(invalid(
                    id,
                    format!(
                        "the selected constructor of {} has no parameter {unknown}",
                        description.name
                    ),
                ));
            }
        }

        let mut ctor_parameters = Vec::with_capacity(ctor.parameters.len());
        for parameter in &ctor.parameters {
            let type_ref = parameter.type_ref.substitute(&bindings);
            let configured = ctor_configuration.and_then(|c| c.parameter(&parameter.name));
            let value =
                self.resolve_value(state, id, &parameter.name, &type_ref, configured, None)?;
            ctor_parameters.push(ParameterDefinition {
                name: parameter.name.clone(),
                position: parameter.position,
                type_ref,
                value,
            });
        }

        let mut properties = Vec::new();
        for property in description.properties.iter().filter(|p| p.can_write) {
            let type_ref = property.type_ref.substitute(&bindings);
            let value = self.resolve_value(
                state,
                id,
                &property.name,
                &type_ref,
                configuration.member(&property.name),
                Some(configuration),
            )?;
            properties.push(PropertyDefinition {
                name: property.name.clone(),
                type_ref,
                value,
            });
        }

        let mut fields = Vec::new();
        for field in description.fields.iter().filter(|f| !f.is_readonly) {
            let type_ref = field.type_ref.substitute(&bindings);
            let value = self.resolve_value(
                state,
                id,
                &field.name,
                &type_ref,
                configuration.member(&field.name),
                Some(configuration),
            )?;
            fields.push(FieldDefinition {
                name: field.name.clone(),
                type_ref,
                value,
            });
        }

        Ok(ClassNode {
            id: id.clone(),
            runtime_type: runtime_type.clone(),
            ctor,
            ctor_parameters,
            properties,
            fields,
        })
    }

    fn mock_node(
        &self,
        state: &mut BuildState,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
        configuration: &ConfigurationItem,
    ) -> Result<MockNode> {
        let description = &runtime_type.description;
        let bindings = self.owner_bindings(runtime_type, id)?;
        validate_mock_members(id, description, configuration)?;

        let mut properties = Vec::new();
        for property in description.properties.iter().filter(|p| p.can_read) {
            let type_ref = property.type_ref.substitute(&bindings);
            let value = self.resolve_value(
                state,
                id,
                &property.name,
                &type_ref,
                configuration.member(&property.name),
                Some(configuration),
            )?;
            properties.push(PropertyDefinition {
                name: property.name.clone(),
                type_ref,
                value,
            });
        }

        let mut methods = Vec::new();
        for method in &description.methods {
            let key = method.unique_name();
            let configured = configuration.member(&key);
            let return_type = method.return_type.substitute(&bindings);

            let return_value = if return_type.is_void() {
                match configured {
                    None | Some(MemberConfiguration::Null { .. }) => None,
                    Some(_) => {
                        return Err(invalid(
                            id,
                            format!("method {key} returns void and cannot be given a value"),
                        ))
                    }
                }
            } else if method.has_open_return_type() {
                match configured {
                    None | Some(MemberConfiguration::Null { .. }) => Some(ValueDefinition::Null),
                    Some(_) => {
                        return Err(invalid(
                            id,
                            format!(
                                "the return type {return_type} of {key} depends on a method \
                                 type parameter"
                            ),
                        ))
                    }
                }
            } else {
                Some(self.resolve_value(
                    state,
                    id,
                    &key,
                    &return_type,
                    configured,
                    Some(configuration),
                )?)
            };

            methods.push(MethodDefinition {
                callbacks: configuration.callbacks(&key),
                key,
                method: method.clone(),
                return_value,
            });
        }

        Ok(MockNode {
            id: id.clone(),
            runtime_type: runtime_type.clone(),
            properties,
            methods,
        })
    }

    /// Bindings of the owner's generic parameters, recovered by matching its
    /// generic definition against the instantiation
    fn owner_bindings(
        &self,
        runtime_type: &RuntimeTypeDescription,
        id: &FixtureItemId,
    ) -> Result<HashMap<String, TypeRef>> {
        let description = &runtime_type.description;
        if description.generic_parameters.is_empty() {
            return Ok(HashMap::new());
        }
        if runtime_type.type_ref.generic_arguments().is_empty() {
            debug!(id = %id, "generic type without arguments, binding parameters to object");
            return Ok(description
                .generic_parameters
                .iter()
                .map(|p| (p.clone(), TypeRef::object()))
                .collect());
        }
        GenericTypeMatcher::new(self.provider)
            .build(&description.generic_definition(), &runtime_type.type_ref)
            .map(|node| node.bindings())
            .map_err(|e| generic_failure(id, e))
    }

    /// Value definition of one member, ctor parameter or method result
    ///
    /// `parent` is the owner's configuration; its dotted entries below
    /// `member` are layered over a nested fixture's own configuration.
    fn resolve_value(
        &self,
        state: &mut BuildState,
        owner: &FixtureItemId,
        member: &str,
        member_type: &TypeRef,
        configured: Option<&MemberConfiguration>,
        parent: Option<&ConfigurationItem>,
    ) -> Result<ValueDefinition> {
        let default;
        let configuration = match configured {
            Some(configuration) => configuration,
            None => {
                default =
                    self.system_defaults
                        .default_for(self.provider, owner, member, member_type);
                &default
            }
        };
        trace!(
            owner = %owner,
            member,
            %member_type,
            source = %configuration.source(),
            "resolving member"
        );

        let is_nullable = member_type.nullable_inner().is_some();
        match configuration {
            MemberConfiguration::Null { .. } => {
                let inner = member_type.nullable_inner().unwrap_or(member_type);
                if !is_nullable && self.is_value_type(inner) {
                    return Err(invalid(
                        owner,
                        format!("member {member} of type {member_type} cannot be null"),
                    ));
                }
                Ok(ValueDefinition::Null)
            }
            MemberConfiguration::Unique { .. } => {
                let runtime_type = self.base_runtime_type(owner, member, member_type)?;
                Ok(self.leaf(owner, member, member_type, runtime_type, BaseValueDefinition::Unique))
            }
            MemberConfiguration::Raw { value, .. } => {
                let runtime_type = self.base_runtime_type(owner, member, member_type)?;
                let value = coerce(owner, member, &runtime_type.description, value)?;
                Ok(self.leaf(
                    owner,
                    member,
                    member_type,
                    runtime_type,
                    BaseValueDefinition::Raw(value),
                ))
            }
            MemberConfiguration::Link { target, .. } => {
                self.resolve_link(state, owner, member, member_type, target, parent)
            }
            MemberConfiguration::Ctor(_) => Err(invalid(
                owner,
                format!("member {member} holds a constructor configuration"),
            )),
        }
    }

    fn resolve_link(
        &self,
        state: &mut BuildState,
        owner: &FixtureItemId,
        member: &str,
        member_type: &TypeRef,
        target: &FixtureItemId,
        parent: Option<&ConfigurationItem>,
    ) -> Result<ValueDefinition> {
        let matcher = GenericTypeMatcher::new(self.provider);
        if !matcher.is_assignable(member_type, target.type_ref()) {
            return Err(invalid(
                owner,
                format!("{target} is not assignable to member {member} of type {member_type}"),
            ));
        }

        let target_type = if target.type_ref().is_object() {
            member_type.clone()
        } else {
            target.type_ref().clone()
        };
        let target_id = if target.is_named() || target.root_item_path().is_some() {
            target.with_type(target_type.clone())
        } else {
            owner.child(member, target_type.clone())
        };

        if target_id.is_named()
            && (state.stack.contains(&target_id) || state.defined.contains(&target_id))
        {
            debug!(
                owner = %owner,
                member,
                target = %target_id,
                "deferring named fixture reference"
            );
            return Ok(ValueDefinition::Deferred(target_id));
        }

        let stored = self
            .store
            .get(&target_id)
            .cloned()
            .unwrap_or_else(|| ConfigurationItem::new(target_id.clone()));
        let nested = parent.and_then(|p| p.nested(member, &target_id));
        let configuration = stored.merge_optional(nested.as_ref())?;

        let runtime_type = self.provider.runtime_description(&target_type)?;
        let node = self.build_node(state, &runtime_type, &target_id, &configuration)?;
        Ok(ValueDefinition::node(node))
    }

    fn base_runtime_type(
        &self,
        owner: &FixtureItemId,
        member: &str,
        member_type: &TypeRef,
    ) -> Result<RuntimeTypeDescription> {
        if member_type.contains_parameters() {
            return Err(invalid(
                owner,
                format!("the generic type {member_type} of member {member} cannot be resolved"),
            ));
        }
        match self.provider.runtime_description(member_type) {
            Ok(runtime_type) if runtime_type.description.is_base_type() => Ok(runtime_type),
            _ => Err(invalid(
                owner,
                format!("member {member} of type {member_type} is not a base type"),
            )),
        }
    }

    fn leaf(
        &self,
        owner: &FixtureItemId,
        member: &str,
        member_type: &TypeRef,
        runtime_type: RuntimeTypeDescription,
        value: BaseValueDefinition,
    ) -> ValueDefinition {
        ValueDefinition::node(FixtureItemDefinitionNode::BaseType(BaseTypeNode {
            id: owner.child(member, member_type.clone()),
            is_nullable: runtime_type.is_nullable,
            runtime_type,
            value,
        }))
    }

    /// Whether `type_ref` denotes a non-nullable value type
    fn is_value_type(&self, type_ref: &TypeRef) -> bool {
        self.provider
            .describe(type_ref)
            .is_some_and(|description| match description.kind {
                TypeKind::BaseType(kind) => kind.is_value_type(),
                TypeKind::Struct => true,
                TypeKind::Class | TypeKind::Interface => false,
            })
    }
}

fn validate_class_members(
    id: &FixtureItemId,
    description: &TypeDescription,
    configuration: &ConfigurationItem,
) -> Result<()> {
    for head in configuration.configured_member_heads() {
        let directly_configured = configuration.member(&head).is_some();
        if let Some(property) = description.find_property(&head) {
            if directly_configured && !property.can_write {
                return Err(invalid(id, format!("property {head} is read-only")));
            }
            continue;
        }
        if let Some(field) = description.find_field(&head) {
            if directly_configured && field.is_readonly {
                return Err(invalid(id, format!("field {head} is read-only")));
            }
            continue;
        }
        if description.find_method(&head).is_some() {
            return Err(invalid(
                id,
                format!(
                    "method {head} can only be configured when {} is a mock",
                    description.name
                ),
            ));
        }
        return Err(invalid(
            id,
            format!("type {} has no member {head}", description.name),
        ));
    }
    Ok(())
}

fn validate_mock_members(
    id: &FixtureItemId,
    description: &TypeDescription,
    configuration: &ConfigurationItem,
) -> Result<()> {
    if configuration.ctor_configuration().is_some() {
        return Err(invalid(
            id,
            format!("mock of {} is not built through a constructor", description.name),
        ));
    }
    for head in configuration.configured_member_heads() {
        if description.find_property(&head).is_some() || description.find_method(&head).is_some()
        {
            continue;
        }
        if description.find_field(&head).is_some() {
            return Err(invalid(
                id,
                format!("field {head} cannot be configured on a mock"),
            ));
        }
        return Err(invalid(
            id,
            format!("type {} has no member {head}", description.name),
        ));
    }
    Ok(())
}

/// Convert a configured literal to the member's base type
fn coerce(
    owner: &FixtureItemId,
    member: &str,
    description: &TypeDescription,
    value: &Value,
) -> Result<Value> {
    let mismatch = || {
        invalid(
            owner,
            format!(
                "value {value} does not fit member {member} of type {}",
                description.name
            ),
        )
    };
    let Some(kind) = description.base_type_kind() else {
        return Err(mismatch());
    };
    if kind != BaseTypeKind::Enum {
        return value.coerce_to(kind).ok_or_else(mismatch);
    }

    let variant = match value {
        Value::Enum { type_name, variant } if *type_name == description.name => variant,
        Value::String(variant) => variant,
        _ => return Err(mismatch()),
    };
    if description.enum_variants.contains(variant) {
        Ok(Value::Enum {
            type_name: description.name.clone(),
            variant: variant.clone(),
        })
    } else {
        Err(mismatch())
    }
}

fn invalid(id: &FixtureItemId, message: impl Into<String>) -> Error {
    Error::invalid_configuration(id.path(), message)
}

fn generic_failure(id: &FixtureItemId, error: GenericMatchError) -> Error {
    invalid(id, error.to_string())
}

/// Re-anchor an invalid configuration failure at `id`
fn at_path(id: &FixtureItemId, error: Error) -> Error {
    match error {
        Error::InvalidConfiguration { message, .. } => invalid(id, message),
        other => other,
    }
}
