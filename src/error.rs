//! Error types for binding
//!
//! Every fatal failure aborts the whole bind. Failures raised while a field
//! is processed are wrapped in [`BindError::Tag`] so the offending tag text
//! travels with the error.

use thiserror::Error;

/// Error reported by an extraction function or struct method.
pub type FuncError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used across the crate
pub type Result<T, E = BindError> = std::result::Result<T, E>;

/// A value could not be converted into a field's type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot cast {value} to {target}: {reason}")]
pub struct CastError {
    /// Short rendering of the offending value
    pub value: String,
    /// Name of the target kind, e.g. `i32` or `Vec<bool>`
    pub target: &'static str,
    pub reason: String,
}

impl CastError {
    pub(crate) fn new(
        value: impl Into<String>,
        target: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            target,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BindError {
    /// The bind target is not a struct (or an allocated pointer to one)
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A tag failed to parse
    #[error("malformed expression `{raw}`: {reason}")]
    MalformedExpression { raw: String, reason: String },

    /// No method or registered function with this name
    #[error("function not found: {0}")]
    FunctionNotFound(String),

    /// The invoked function reported an error
    #[error("function {name} failed: {source}")]
    FunctionExecution {
        name: String,
        #[source]
        source: FuncError,
    },

    /// Strict casting rejected a value
    #[error(transparent)]
    Cast(#[from] CastError),

    /// A method effect named a field the struct does not declare
    #[error("{ty} has no field named {field}")]
    UnknownField { ty: &'static str, field: String },

    /// Engine configuration rejected at construction
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Reading the document failed
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// Context wrapper carrying the raw tag of the failing field
    #[error("tag=`{tag}`: {source}")]
    Tag {
        tag: String,
        #[source]
        source: Box<BindError>,
    },
}

impl BindError {
    /// Wrap this error with the raw tag of the field being bound.
    pub(crate) fn in_tag(self, tag: &str) -> Self {
        BindError::Tag {
            tag: tag.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all tag context removed.
    pub fn root(&self) -> &BindError {
        let mut current = self;
        while let BindError::Tag { source, .. } = current {
            current = source;
        }
        current
    }

    /// Raw tags from the outermost field down to the failing one.
    pub fn tag_path(&self) -> Vec<&str> {
        let mut tags = Vec::new();
        let mut current = self;
        while let BindError::Tag { tag, source } = current {
            tags.push(tag.as_str());
            current = source;
        }
        tags
    }
}
