//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! The transport layer is not part of this workspace; whichever one sits on
//! top uses this mapping so every transport reports the same codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Validation` -> 400 (Bad Request)
/// - `Reference` -> 404 (Not Found)
/// - `Persistence` -> 500 (Internal Server Error)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use hbnb_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "City",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Validation(_) => 400,
        // A dangling user_id is reported like a missing resource.
        RepositoryError::Reference { .. } => 404,
        RepositoryError::Persistence(_) => 500,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::not_found("Place", "p-1");
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let error = RepositoryError::Validation("Not a JSON".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_reference_maps_to_404() {
        let error = RepositoryError::reference("User", "u-1");
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_persistence_maps_to_500() {
        let error = RepositoryError::Persistence("rename failed".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("database locked".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_query_failed_maps_to_500() {
        let error = RepositoryError::QueryFailed("invalid query syntax".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
    }
}
