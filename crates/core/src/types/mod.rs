//! Structural type references and the type description model
//!
//! A [`TypeRef`] names a type the way a member declaration does: possibly
//! generic, possibly an unbound type parameter, possibly an array. The
//! [`description`] module carries the read-only facts about a named type
//! (its kind, constructors and members) and [`registry`] resolves one into
//! the other.

pub mod description;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

use crate::error::{Error, Result};

pub use description::{
    FieldDescription, MethodDescription, ParameterDescription, PropertyDescription,
    TypeDescription, TypeDescriptionBuilder, TypeKind,
};
pub use registry::{RuntimeTypeDescription, TypeDescriptionProvider, TypeRegistry};

/// Name of the universal top type
pub const OBJECT_TYPE_NAME: &str = "object";
/// Name of the single-argument nullable wrapper
pub const NULLABLE_TYPE_NAME: &str = "nullable";
/// Name of the return type of methods without a value
pub const VOID_TYPE_NAME: &str = "void";

/// Reference to a type, bound or unbound
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A generic type parameter such as `T`
    Parameter { name: String },
    /// A named type with its generic arguments (empty when not generic)
    Named { name: String, arguments: Vec<TypeRef> },
    /// An array; the rank counts as the generic arity of the array
    Array { element: Box<TypeRef>, rank: usize },
}

impl TypeRef {
    /// A non-generic named type
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// A generic named type with arguments
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self::Named {
            name: name.into(),
            arguments,
        }
    }

    /// A type parameter
    pub fn parameter(name: impl Into<String>) -> Self {
        Self::Parameter { name: name.into() }
    }

    /// An array of `element` with the given rank
    pub fn array(element: TypeRef, rank: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            rank,
        }
    }

    /// The top type
    pub fn object() -> Self {
        Self::named(OBJECT_TYPE_NAME)
    }

    /// The void pseudo type
    pub fn void() -> Self {
        Self::named(VOID_TYPE_NAME)
    }

    /// `inner` wrapped in the nullable type
    pub fn nullable(inner: TypeRef) -> Self {
        Self::generic(NULLABLE_TYPE_NAME, vec![inner])
    }

    /// The definition name of a named type
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(
            self,
            TypeRef::Named { name, arguments } if name == OBJECT_TYPE_NAME && arguments.is_empty()
        )
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Named { name, .. } if name == VOID_TYPE_NAME)
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, TypeRef::Parameter { .. })
    }

    /// The wrapped type when this is `nullable<T>`
    pub fn nullable_inner(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Named { name, arguments } if name == NULLABLE_TYPE_NAME => {
                arguments.first()
            }
            _ => None,
        }
    }

    /// Generic arguments, or the element type of an array
    pub fn generic_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Parameter { .. } => &[],
            TypeRef::Named { arguments, .. } => arguments,
            TypeRef::Array { element, .. } => std::slice::from_ref(element.as_ref()),
        }
    }

    /// Whether a type parameter occurs anywhere in this reference
    pub fn contains_parameters(&self) -> bool {
        match self {
            TypeRef::Parameter { .. } => true,
            TypeRef::Named { arguments, .. } => arguments.iter().any(TypeRef::contains_parameters),
            TypeRef::Array { element, .. } => element.contains_parameters(),
        }
    }

    /// Replace type parameters by their bindings; unbound parameters stay as they are
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        match self {
            TypeRef::Parameter { name } => bindings
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeRef::Named { name, arguments } => TypeRef::Named {
                name: name.clone(),
                arguments: arguments.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeRef::Array { element, rank } => TypeRef::Array {
                element: Box::new(element.substitute(bindings)),
                rank: *rank,
            },
        }
    }

    /// Last segment of the name, without namespace and generic arguments
    pub fn short_name(&self) -> String {
        match self {
            TypeRef::Parameter { name } => name.clone(),
            TypeRef::Named { name, .. } => name.rsplit('.').next().unwrap_or(name).to_string(),
            TypeRef::Array { element, rank } => {
                format!("{}{}", element.short_name(), array_suffix(*rank))
            }
        }
    }
}

fn array_suffix(rank: usize) -> String {
    format!("[{}]", ",".repeat(rank.saturating_sub(1)))
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Parameter { name } => write!(f, "{name}"),
            TypeRef::Named { name, arguments } if arguments.is_empty() => write!(f, "{name}"),
            TypeRef::Named { name, arguments } => {
                write!(f, "{name}<")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ">")
            }
            TypeRef::Array { element, rank } => write!(f, "{element}{}", array_suffix(*rank)),
        }
    }
}

impl FromStr for TypeRef {
    type Err = Error;

    /// Parses the textual form produced by `Display`. Every name is read as a
    /// named type; parameters cannot be written in this form.
    fn from_str(s: &str) -> Result<Self> {
        let mut parser = TypeParser { input: s, pos: 0 };
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(Error::invalid_input(format!(
                "unexpected trailing input in type '{s}' at {}",
                parser.pos
            )));
        }
        Ok(parsed)
    }
}

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(Error::invalid_input(format!(
                "expected type name in '{}' at {start}",
                self.input
            )));
        }
        let name = self.input[start..self.pos].to_string();

        let mut arguments = Vec::new();
        if self.eat('<') {
            loop {
                arguments.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(Error::invalid_input(format!(
                    "unterminated generic argument list in '{}'",
                    self.input
                )));
            }
        }

        let mut parsed = TypeRef::Named { name, arguments };
        while self.eat('[') {
            let mut rank = 1;
            while self.eat(',') {
                rank += 1;
            }
            if !self.eat(']') {
                return Err(Error::invalid_input(format!(
                    "unterminated array suffix in '{}'",
                    self.input
                )));
            }
            parsed = TypeRef::array(parsed, rank);
        }
        Ok(parsed)
    }
}

/// Primitive and near-primitive types that have a dedicated unique-value generator
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BaseTypeKind {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    String,
    Enum,
    Bytes,
}

impl BaseTypeKind {
    /// Value types cannot hold null unless wrapped in `nullable`
    pub fn is_value_type(self) -> bool {
        !matches!(self, BaseTypeKind::String | BaseTypeKind::Bytes)
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BaseTypeKind::I8
                | BaseTypeKind::U8
                | BaseTypeKind::I16
                | BaseTypeKind::U16
                | BaseTypeKind::I32
                | BaseTypeKind::U32
                | BaseTypeKind::I64
                | BaseTypeKind::U64
        )
    }

    /// Registered type name for the builtin kinds; enums are user types
    pub fn type_name(self) -> Option<&'static str> {
        Some(match self {
            BaseTypeKind::Bool => "bool",
            BaseTypeKind::Char => "char",
            BaseTypeKind::I8 => "i8",
            BaseTypeKind::U8 => "u8",
            BaseTypeKind::I16 => "i16",
            BaseTypeKind::U16 => "u16",
            BaseTypeKind::I32 => "i32",
            BaseTypeKind::U32 => "u32",
            BaseTypeKind::I64 => "i64",
            BaseTypeKind::U64 => "u64",
            BaseTypeKind::F32 => "f32",
            BaseTypeKind::F64 => "f64",
            BaseTypeKind::Decimal => "decimal",
            BaseTypeKind::String => "string",
            BaseTypeKind::Bytes => BYTES_TYPE_NAME,
            BaseTypeKind::Enum => return None,
        })
    }

    /// Type reference for the builtin kinds
    pub fn type_ref(self) -> Option<TypeRef> {
        match self {
            BaseTypeKind::Bytes => Some(TypeRef::array(TypeRef::named("u8"), 1)),
            other => other.type_name().map(TypeRef::named),
        }
    }
}

/// Registry key of the byte array base type
pub const BYTES_TYPE_NAME: &str = "u8[]";
