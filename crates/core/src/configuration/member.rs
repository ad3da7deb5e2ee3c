//! Per-member configuration variants

use im::{OrdMap, Vector};
use std::fmt::{self, Display};

use crate::fixture_item_id::FixtureItemId;
use crate::types::{MethodDescription, TypeRef};
use crate::value::Value;

/// Where a configuration entry came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ConfigurationSource {
    /// Filled in by the engine for members nobody configured
    SystemDefault,
    /// Authored in code by a fixture author
    #[default]
    User,
    /// An ad-hoc override inside a single test
    Test,
    /// Loaded from a persisted configuration document
    File { path: String },
}

impl Display for ConfigurationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationSource::SystemDefault => write!(f, "system default"),
            ConfigurationSource::User => write!(f, "user configuration"),
            ConfigurationSource::Test => write!(f, "test override"),
            ConfigurationSource::File { path } => write!(f, "file {path}"),
        }
    }
}

/// Configuration of one constructor, property, field, method or parameter
#[derive(Debug, Clone, PartialEq)]
pub enum MemberConfiguration {
    /// A literal value
    Raw {
        name: String,
        value: Value,
        source: ConfigurationSource,
    },
    /// A generator-produced unique value
    Unique {
        name: String,
        source: ConfigurationSource,
    },
    /// An explicit null
    Null {
        name: String,
        source: ConfigurationSource,
    },
    /// Another fixture; named targets resolve to one shared instance
    Link {
        name: String,
        target: FixtureItemId,
        source: ConfigurationSource,
    },
    /// Constructor selection and per-parameter configuration
    Ctor(CtorMemberConfiguration),
}

impl MemberConfiguration {
    pub fn raw(name: impl Into<String>, value: Value) -> Self {
        Self::Raw {
            name: name.into(),
            value,
            source: ConfigurationSource::default(),
        }
    }

    pub fn unique(name: impl Into<String>) -> Self {
        Self::Unique {
            name: name.into(),
            source: ConfigurationSource::default(),
        }
    }

    pub fn null(name: impl Into<String>) -> Self {
        Self::Null {
            name: name.into(),
            source: ConfigurationSource::default(),
        }
    }

    pub fn link(name: impl Into<String>, target: FixtureItemId) -> Self {
        Self::Link {
            name: name.into(),
            target,
            source: ConfigurationSource::default(),
        }
    }

    /// Member key this configuration belongs to
    pub fn name(&self) -> &str {
        match self {
            Self::Raw { name, .. }
            | Self::Unique { name, .. }
            | Self::Null { name, .. }
            | Self::Link { name, .. } => name,
            Self::Ctor(_) => MethodDescription::CTOR_NAME,
        }
    }

    pub fn source(&self) -> &ConfigurationSource {
        match self {
            Self::Raw { source, .. }
            | Self::Unique { source, .. }
            | Self::Null { source, .. }
            | Self::Link { source, .. } => source,
            Self::Ctor(ctor) => &ctor.source,
        }
    }

    pub fn with_source(self, source: ConfigurationSource) -> Self {
        match self {
            Self::Raw { name, value, .. } => Self::Raw {
                name,
                value,
                source,
            },
            Self::Unique { name, .. } => Self::Unique { name, source },
            Self::Null { name, .. } => Self::Null { name, source },
            Self::Link { name, target, .. } => Self::Link {
                name,
                target,
                source,
            },
            Self::Ctor(ctor) => Self::Ctor(CtorMemberConfiguration { source, ..ctor }),
        }
    }

    /// Same configuration under a different member key; ctor configurations keep theirs
    pub fn renamed(self, new_name: impl Into<String>) -> Self {
        let new_name = new_name.into();
        match self {
            Self::Raw { value, source, .. } => Self::Raw {
                name: new_name,
                value,
                source,
            },
            Self::Unique { source, .. } => Self::Unique {
                name: new_name,
                source,
            },
            Self::Null { source, .. } => Self::Null {
                name: new_name,
                source,
            },
            Self::Link { target, source, .. } => Self::Link {
                name: new_name,
                target,
                source,
            },
            Self::Ctor(ctor) => Self::Ctor(ctor),
        }
    }

    pub fn as_ctor(&self) -> Option<&CtorMemberConfiguration> {
        match self {
            Self::Ctor(ctor) => Some(ctor),
            _ => None,
        }
    }
}

/// Constructor configuration: nested parameter configurations plus the
/// parameter types used to pick an overload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CtorMemberConfiguration {
    pub parameters: OrdMap<String, MemberConfiguration>,
    /// Empty when no particular overload was requested
    pub parameter_types: Vector<TypeRef>,
    pub source: ConfigurationSource,
}

impl CtorMemberConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the overload with exactly these parameter types
    pub fn for_overload(parameter_types: impl IntoIterator<Item = TypeRef>) -> Self {
        Self {
            parameter_types: parameter_types.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_parameter(&self, parameter: MemberConfiguration) -> Self {
        Self {
            parameters: self
                .parameters
                .update(parameter.name().to_string(), parameter),
            ..self.clone()
        }
    }

    pub fn with_source(&self, source: ConfigurationSource) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&MemberConfiguration> {
        self.parameters.get(name)
    }

    pub fn has_overload_request(&self) -> bool {
        !self.parameter_types.is_empty()
    }
}
