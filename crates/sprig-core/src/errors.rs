//! Error types for the Sprig engine.

use thiserror::Error;

use crate::host::NodeId;

/// Errors reported by a host DOM backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("invalid element tag {tag:?}")]
    InvalidTag { tag: String },

    #[error("unknown host node {id:?}")]
    UnknownNode { id: NodeId },

    #[error("host node {id:?} is not an element")]
    NotAnElement { id: NodeId },
}

/// Errors during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("deferred expression rendered without a scope binding")]
    UnboundExpression,

    #[error("event prop '{key}' did not evaluate to a handler")]
    NotAHandler { key: String },

    #[error("branch {index} selected but only {children} children present")]
    MissingBranch { index: usize, children: usize },

    #[error("'each' expects a list, got {got}")]
    ExpectedList { got: &'static str },

    #[error("cannot render {what} as text")]
    Unrenderable { what: &'static str },
}
