use thiserror::Error;

use crate::show::ValidationError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
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
    /// Wraps a validation failure with the payload index it came from.
    /// Any other error is returned unchanged.
    pub fn at_index(self, index: usize) -> Self {
        match self {
            Self::Validation(error) => Self::Validation(error.at_index(index)),
            other => other,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_validation_is_transparent() {
        let error: RepositoryError = ValidationError::Required {
            field: "title".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "title is required");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Show",
            id: "show/test".to_string(),
        };
        assert_eq!(error.to_string(), "Show already exists: show/test");
    }

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Show",
            id: "show/missing".to_string(),
        };
        assert_eq!(error.to_string(), "Show not found: show/missing");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("dispatch failure".to_string());
        assert_eq!(error.to_string(), "Connection failed: dispatch failure");
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("Missing or invalid field: slug".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid data: Missing or invalid field: slug"
        );
    }

    #[test]
    fn test_at_index_wraps_validation_only() {
        let validation: RepositoryError = ValidationError::Required {
            field: "title".to_string(),
        }
        .into();
        assert_eq!(
            validation.at_index(3).to_string(),
            "payload[3]: title is required"
        );

        let duplicate = RepositoryError::AlreadyExists {
            entity_type: "Show",
            id: "show/a".to_string(),
        };
        assert_eq!(duplicate.clone().at_index(3), duplicate);
    }
}
