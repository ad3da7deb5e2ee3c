//! Read-only descriptions of types and their members

use std::collections::HashSet;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::{BaseTypeKind, TypeRef};

/// Classification of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    BaseType(BaseTypeKind),
    Class,
    Struct,
    Interface,
}

/// Constructor or method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescription {
    pub name: String,
    pub type_ref: TypeRef,
    pub position: usize,
}

impl ParameterDescription {
    pub fn new(name: impl Into<String>, type_ref: TypeRef, position: usize) -> Self {
        Self {
            name: name.into(),
            type_ref,
            position,
        }
    }
}

/// Constructor or method signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescription {
    pub name: String,
    pub parameters: Vec<ParameterDescription>,
    /// `void` for constructors and methods without a value
    pub return_type: TypeRef,
    /// Method-level type parameters, e.g. `T` in `T Get<T>()`
    #[serde(default)]
    pub generic_parameters: Vec<String>,
}

impl MethodDescription {
    /// Reserved member name of constructors
    pub const CTOR_NAME: &'static str = ".ctor";

    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            generic_parameters: Vec::new(),
        }
    }

    /// A constructor taking the given `(name, type)` parameters in order
    pub fn constructor<N: Into<String>>(
        parameters: impl IntoIterator<Item = (N, TypeRef)>,
    ) -> Self {
        Self::new(Self::CTOR_NAME, TypeRef::void()).with_parameters(parameters)
    }

    pub fn with_parameters<N: Into<String>>(
        mut self,
        parameters: impl IntoIterator<Item = (N, TypeRef)>,
    ) -> Self {
        self.parameters = parameters
            .into_iter()
            .enumerate()
            .map(|(position, (name, type_ref))| ParameterDescription::new(name, type_ref, position))
            .collect();
        self
    }

    pub fn with_generic_parameters<N: Into<String>>(
        mut self,
        generic_parameters: impl IntoIterator<Item = N>,
    ) -> Self {
        self.generic_parameters = generic_parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.name == Self::CTOR_NAME
    }

    /// Member key of the method: the bare name without parameters, otherwise
    /// the name followed by the full parameter types (`Drive__i32_string`,
    /// `Put__List<i32>`). Namespace dots become `::` so the key never reads
    /// as a nested member path.
    pub fn unique_name(&self) -> String {
        if self.parameters.is_empty() {
            self.name.clone()
        } else {
            let types: Vec<String> = self
                .parameters
                .iter()
                .map(|p| p.type_ref.to_string().replace(' ', "").replace('.', "::"))
                .collect();
            format!("{}__{}", self.name, types.join("_"))
        }
    }

    /// Parameter types in declaration order
    pub fn parameter_types(&self) -> Vec<TypeRef> {
        self.parameters.iter().map(|p| p.type_ref.clone()).collect()
    }

    /// Whether the return type depends on a method-level type parameter
    pub fn has_open_return_type(&self) -> bool {
        self.generic_parameters
            .iter()
            .any(|g| mentions_parameter(&self.return_type, g))
    }
}

fn mentions_parameter(ty: &TypeRef, parameter: &str) -> bool {
    match ty {
        TypeRef::Parameter { name } => name == parameter,
        TypeRef::Named { arguments, .. } => {
            arguments.iter().any(|a| mentions_parameter(a, parameter))
        }
        TypeRef::Array { element, .. } => mentions_parameter(element, parameter),
    }
}

/// Property of a class or interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescription {
    pub name: String,
    pub type_ref: TypeRef,
    pub can_read: bool,
    pub can_write: bool,
}

impl PropertyDescription {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            can_read: true,
            can_write: true,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.can_write = false;
        self
    }
}

/// Field of a class or struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    pub name: String,
    pub type_ref: TypeRef,
    pub is_readonly: bool,
}

impl FieldDescription {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            is_readonly: false,
        }
    }

    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }
}

/// Facts about one type definition
///
/// Member types are expressed in terms of the definition's own generic
/// parameters; binding them to an instantiation is the job of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TypeDescription {
    /// Definition name, e.g. `List` for `List<T>`
    pub name: String,

    pub kind: TypeKind,

    #[builder(default = "Vec::new()")]
    pub generic_parameters: Vec<String>,

    #[builder(default = "false")]
    pub is_abstract: bool,

    #[builder(default = "None")]
    pub base_type: Option<TypeRef>,

    #[builder(default = "Vec::new()")]
    pub interfaces: Vec<TypeRef>,

    #[builder(default = "Vec::new()")]
    pub constructors: Vec<MethodDescription>,

    #[builder(default = "Vec::new()")]
    pub properties: Vec<PropertyDescription>,

    #[builder(default = "Vec::new()")]
    pub fields: Vec<FieldDescription>,

    #[builder(default = "Vec::new()")]
    pub methods: Vec<MethodDescription>,

    /// Declared variants, in declaration order, for enum types
    #[builder(default = "Vec::new()")]
    pub enum_variants: Vec<String>,
}

impl TypeDescriptionBuilder {
    /// Method member keys must tell overloads apart
    fn validate(&self) -> std::result::Result<(), String> {
        let mut keys = HashSet::new();
        for method in self.methods.iter().flatten() {
            let key = method.unique_name();
            if !keys.insert(key.clone()) {
                return Err(format!("methods share the member key {key}"));
            }
        }
        Ok(())
    }
}

impl TypeDescription {
    pub fn builder() -> TypeDescriptionBuilder {
        TypeDescriptionBuilder::default()
    }

    /// Description of a builtin base type
    pub fn base(name: impl Into<String>, kind: BaseTypeKind) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::BaseType(kind),
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

    /// Description of an enum with variants in declaration order
    pub fn enumeration<V: Into<String>>(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = V>,
    ) -> Self {
        let mut description = Self::base(name, BaseTypeKind::Enum);
        description.enum_variants = variants.into_iter().map(Into::into).collect();
        description
    }

    /// The unbound generic shape, e.g. `List<T>`
    pub fn generic_definition(&self) -> TypeRef {
        TypeRef::generic(
            self.name.clone(),
            self.generic_parameters
                .iter()
                .map(|p| TypeRef::parameter(p.clone()))
                .collect(),
        )
    }

    pub fn base_type_kind(&self) -> Option<BaseTypeKind> {
        match self.kind {
            TypeKind::BaseType(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_base_type(&self) -> bool {
        matches!(self.kind, TypeKind::BaseType(_))
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyDescription> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDescription> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Find a method by its member key (see [`MethodDescription::unique_name`])
    pub fn find_method(&self, unique_name: &str) -> Option<&MethodDescription> {
        self.methods.iter().find(|m| m.unique_name() == unique_name)
    }

    /// Whether `name` is a configurable member key of this type
    pub fn has_member(&self, name: &str) -> bool {
        name == MethodDescription::CTOR_NAME
            || self.find_property(name).is_some()
            || self.find_field(name).is_some()
            || self.find_method(name).is_some()
    }
}
