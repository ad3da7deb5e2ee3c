use thiserror::Error;

/// Result type for fixtura operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fixture construction
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine settings errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configuration item cannot be reconciled with the type it configures
    #[error("Invalid configuration for {path}: {message}")]
    InvalidConfiguration { path: String, message: String },

    /// Unbound and bound generic shapes do not line up
    #[error("Generic match error: {0}")]
    GenericMatch(#[from] GenericMatchError),

    /// A definition node reached a creator that cannot handle it
    #[error("Resolve type error: {0}")]
    ResolveType(String),

    /// Materializing an instance failed (factory or member setter)
    #[error("Creation of {path} failed: {message}")]
    Creation { path: String, message: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Failure of the generic parameter matcher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenericMatchError {
    /// No supertype of the bound type has the unbound generic definition
    #[error("type {bound} is not assignable to {unbound}")]
    NotAssignable { unbound: String, bound: String },

    /// Both sides share a definition but disagree on argument count or rank
    #[error("type {bound} does not match {unbound}")]
    ArityMismatch { unbound: String, bound: String },
}

impl Error {
    /// Creates a settings error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invalid configuration failure for the item at `path`
    pub fn invalid_configuration(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a resolve type error
    pub fn resolve_type(msg: impl Into<String>) -> Self {
        Self::ResolveType(msg.into())
    }

    /// Creates a creation error for the item at `path`
    pub fn creation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Creation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is an invalid configuration failure
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
