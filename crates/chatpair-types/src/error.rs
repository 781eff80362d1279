use thiserror::Error;

/// Errors related to message operations.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("parent message not found")]
    ParentNotFound,

    #[error("invalid message content: {0}")]
    InvalidContent(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in chatpair-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

impl From<RepositoryError> for MessageError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => MessageError::NotFound,
            other => MessageError::StorageError(other.to_string()),
        }
    }
}
