//! Definition tree nodes
//!
//! A definition tree is the immutable recipe for one fixture object graph.
//! Nodes are produced by the definition tree service and consumed once by a
//! creator.

use fixtura_core::{
    Callback, FixtureItemId, MethodDescription, RuntimeTypeDescription, TypeRef, Value,
};
use im::Vector;

/// How a base-typed leaf obtains its value
#[derive(Debug, Clone, PartialEq)]
pub enum BaseValueDefinition {
    /// A configured literal, already converted to the leaf's kind
    Raw(Value),
    /// A fresh value from the unique-value generators
    Unique,
}

/// The value of a constructor parameter, property, field or method result
#[derive(Debug, Clone, PartialEq)]
pub enum ValueDefinition {
    /// Explicit null
    Null,
    /// A nested fixture built from its own definition
    Node(Box<FixtureItemDefinitionNode>),
    /// A named fixture defined elsewhere in the same tree; resolved through
    /// the instance cache when materialized
    Deferred(FixtureItemId),
}

impl ValueDefinition {
    pub fn node(node: FixtureItemDefinitionNode) -> Self {
        Self::Node(Box::new(node))
    }

    pub fn as_node(&self) -> Option<&FixtureItemDefinitionNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    pub position: usize,
    /// Declared type with the owner's generic parameters bound
    pub type_ref: TypeRef,
    pub value: ValueDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub name: String,
    pub type_ref: TypeRef,
    pub value: ValueDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub type_ref: TypeRef,
    pub value: ValueDefinition,
}

/// A mocked method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    /// Member key, see [`MethodDescription::unique_name`]
    pub key: String,
    pub method: MethodDescription,
    /// `None` for methods returning `void`
    pub return_value: Option<ValueDefinition>,
    /// Invoked in order on every call
    pub callbacks: Vector<Callback>,
}

/// A primitive leaf
#[derive(Debug, Clone, PartialEq)]
pub struct BaseTypeNode {
    pub id: FixtureItemId,
    pub runtime_type: RuntimeTypeDescription,
    pub value: BaseValueDefinition,
    /// Wrap the produced value in the nullable representation
    pub is_nullable: bool,
}

/// A real instance built through a constructor
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub id: FixtureItemId,
    pub runtime_type: RuntimeTypeDescription,
    pub ctor: MethodDescription,
    pub ctor_parameters: Vec<ParameterDefinition>,
    pub properties: Vec<PropertyDefinition>,
    pub fields: Vec<FieldDefinition>,
}

/// A dynamic test double for an interface or a class
#[derive(Debug, Clone, PartialEq)]
pub struct MockNode {
    pub id: FixtureItemId,
    pub runtime_type: RuntimeTypeDescription,
    pub properties: Vec<PropertyDefinition>,
    pub methods: Vec<MethodDefinition>,
}

/// One constructed object of the graph
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureItemDefinitionNode {
    BaseType(BaseTypeNode),
    Class(ClassNode),
    Mock(MockNode),
}

impl FixtureItemDefinitionNode {
    pub fn id(&self) -> &FixtureItemId {
        match self {
            Self::BaseType(node) => &node.id,
            Self::Class(node) => &node.id,
            Self::Mock(node) => &node.id,
        }
    }

    pub fn runtime_type(&self) -> &RuntimeTypeDescription {
        match self {
            Self::BaseType(node) => &node.runtime_type,
            Self::Class(node) => &node.runtime_type,
            Self::Mock(node) => &node.runtime_type,
        }
    }

    /// Short label of the variant for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::BaseType(_) => "base type",
            Self::Class(_) => "class",
            Self::Mock(_) => "mock",
        }
    }

    pub fn as_class(&self) -> Option<&ClassNode> {
        match self {
            Self::Class(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_mock(&self) -> Option<&MockNode> {
        match self {
            Self::Mock(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_base_type(&self) -> Option<&BaseTypeNode> {
        match self {
            Self::BaseType(node) => Some(node),
            _ => None,
        }
    }
}

impl ClassNode {
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.ctor_parameters.iter().find(|p| p.name == name)
    }
}

impl MockNode {
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, key: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.key == key)
    }
}
