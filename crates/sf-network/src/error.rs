//! Network construction, validation and perturbation errors.

use sf_core::{NodeId, ReactionId, SfError};
use thiserror::Error;

pub type NetworkResult<T> = Result<T, NetworkError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A name was looked up that is not part of the network.
    #[error("Unknown node: {name}")]
    UnknownNode { name: String },

    #[error("Duplicate node name: {name}")]
    DuplicateName { name: String },

    #[error("Node name must not be empty (node {node})")]
    EmptyName { node: NodeId },

    #[error("Reaction {reaction} refers to non-existent node {node}")]
    InvalidNodeRef { reaction: ReactionId, node: NodeId },

    #[error("Reaction {reaction} lists reactant {node} more than once")]
    DuplicateReactant { reaction: ReactionId, node: NodeId },

    #[error("Network has no nodes")]
    Empty,

    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid {what} at index {index}: {value} ({reason})")]
    InvalidParameter {
        what: &'static str,
        index: usize,
        value: f64,
        reason: &'static str,
    },

    #[error("Knockdown fraction must lie in [0, 1], got {value}")]
    InvalidFraction { value: f64 },

    #[error("Stimulus level must be finite and non-negative, got {value}")]
    InvalidLevel { value: f64 },

    /// Stimulus override targets a node that no input reaction produces.
    #[error("Node {name} has no input reaction and cannot be driven by a stimulus")]
    NotADriver { name: String },
}

impl From<SfError> for NetworkError {
    fn from(err: SfError) -> Self {
        match err {
            SfError::LengthMismatch {
                what,
                expected,
                actual,
            } => NetworkError::LengthMismatch {
                what,
                expected,
                actual,
            },
            SfError::NonFinite { what, value } => NetworkError::InvalidParameter {
                what,
                index: 0,
                value,
                reason: "non-finite",
            },
        }
    }
}
