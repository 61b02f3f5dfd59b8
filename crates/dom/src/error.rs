//! Error types for tree construction
//!
//! Only tree sources and arena lookups fail. Searching never does: a search
//! that finds nothing yields an empty result, not an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Node already attached to a parent: {0}")]
    AlreadyAttached(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("CDP tree error: {0}")]
    Cdp(String),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
}
