//! Error types for element tree operations

use crate::element::ElementId;

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors specific to tree mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Element not found in the tree
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// Invalid parent-child relationship
    #[error("Invalid parent-child relationship: {0}")]
    InvalidRelationship(String),
}
