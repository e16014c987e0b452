use thiserror::Error;

use crate::models::RequestError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{0}")]
    Validation(String),
    #[error("Referenced {entity_type} does not exist: {id}")]
    Reference {
        entity_type: &'static str,
        id: String,
    },
    #[error("Persistence failed: {0}")]
    Persistence(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn reference(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Reference {
            entity_type,
            id: id.into(),
        }
    }
}

impl From<RequestError> for RepositoryError {
    fn from(err: RequestError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
