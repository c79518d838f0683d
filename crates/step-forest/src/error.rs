use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to callers for rejected operations. Structural
/// invariant breakage is not an error: validators report it as a list
/// of [`Violation`] records instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("value not found: {0}")]
    NotFound(i64),
    #[error("duplicate key: {0}")]
    DuplicateKey(i64),
}

/// One violated structural property, as reported by `is_valid_bst`,
/// `check_red_black_properties` or `check_btree_properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Human-readable name of the broken property.
    pub property: String,
    /// Arena index of the offending node, when one can be named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<u32>,
}

impl Violation {
    pub fn new(property: impl Into<String>, node: Option<u32>) -> Self {
        Violation {
            property: property.into(),
            node,
        }
    }
}
