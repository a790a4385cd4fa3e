use thiserror::Error;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Menu item not found: {id}")]
    MenuItemNotFound { id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database connection failed")]
    ConnectionFailed,

    #[error("Item not found")]
    NotFound,

    #[error("Invalid menu item id: {id}")]
    InvalidId { id: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match &*err.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => RepositoryError::ConnectionFailed,
            ErrorKind::BsonSerialization(e) => RepositoryError::Serialization {
                message: e.to_string(),
            },
            ErrorKind::BsonDeserialization(e) => RepositoryError::Serialization {
                message: e.to_string(),
            },
            _ => RepositoryError::Backend {
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
