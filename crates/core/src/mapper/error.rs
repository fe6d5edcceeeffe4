use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

/// Errors reported by a store while executing a statement.
///
/// These describe expected runtime outcomes. Mappers never return them as
/// `Err`; they are carried in [`ModelState::errors`](super::ModelState::errors).
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    /// A uniqueness constraint rejected the write.
    #[error("{entity_type} already exists: {detail}")]
    AlreadyExists {
        entity_type: &'static str,
        detail: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, RepositoryError::AlreadyExists { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors raised by a mapper when it is handed arguments it cannot use.
///
/// These are programming or input-syntax errors and are returned before any
/// statement is built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataMapperError {
    #[error(
        "{} invalid query by args, {} invalid sort by args",
        .invalid_query_by.len(),
        .invalid_sort_by.len()
    )]
    BadQueryArgsBag {
        invalid_query_by: BTreeSet<String>,
        invalid_sort_by: BTreeSet<String>,
    },

    #[error("Invalid value {value:?} for {kind} property {property}")]
    InvalidFilterValue {
        property: String,
        kind: String,
        value: String,
    },

    #[error("Unknown properties: {}", .0.iter().cloned().collect::<Vec<_>>().join(", "))]
    UnknownProperties(BTreeSet<String>),

    #[error("Property {0} cannot be modified")]
    ImmutableProperty(String),

    #[error("Invalid value for property {property}: {reason}")]
    InvalidAssignment { property: String, reason: String },

    #[error("Refusing to modify every row: no filter given")]
    UnfilteredMutation,
}
