use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Invalid authorization header format")]
    InvalidScheme,

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Insufficient scope")]
    InsufficientScope { required_scope: String },
}

impl AuthError {
    /// HTTP status for this failure: 403 for scope problems, 401 otherwise.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InsufficientScope { .. } => 403,
            _ => 401,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingHeader.status_code(), 401);
        assert_eq!(AuthError::InvalidScheme.status_code(), 401);
        assert_eq!(AuthError::InvalidToken.status_code(), 401);
        assert_eq!(
            AuthError::InsufficientScope {
                required_scope: "shows/shows.read".to_string()
            }
            .status_code(),
            403
        );
    }
}
