//! Pure mapping from repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `Validation` -> 400 (Bad Request)
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed`, `Serialization`, `InvalidData` -> 500 (Internal Server Error)
///
/// `InvalidData` only arises from records already in the store that cannot
/// be decoded, so it is a server fault rather than a client one.
///
/// # Examples
///
/// ```
/// use catalog_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::AlreadyExists {
///     entity_type: "Show",
///     id: "show/test".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 409);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::Validation(_) => 400,
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 500,
    }
}
