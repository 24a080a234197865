use auth::AuthenticationError;
use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for Identifier validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier must not be empty")]
    Empty,

    #[error("Identifier too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Identifier contains whitespace or control characters")]
    InvalidCharacters,
}

/// Error for TokenTtl construction failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenTtlError {
    #[error("Token TTL must be positive, got {0} seconds")]
    NotPositive(i64),

    #[error("Token TTL too long: maximum {max} minutes, got {actual}")]
    TooLong { max: i64, actual: i64 },
}

/// Top-level error for authentication, token and authorization operations.
///
/// Domain outcomes stay distinct so the boundary can map each to its own
/// client-visible result. Anything coming from storage, randomness or the
/// hashing algorithm collapses into `Internal`.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Input validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // Domain-level errors
    #[error("Principal not found: {0}")]
    NotFound(String),

    #[error("Token not found")]
    TokenNotFound,

    #[error("Identifier already registered: {0}")]
    IdentifierConflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Forbidden")]
    Forbidden,

    // Infrastructure errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::EmptyPassword | PasswordError::PasswordTooLong { .. } => {
                AuthError::InvalidPassword(err.to_string())
            }
            PasswordError::InvalidParameters(_)
            | PasswordError::HashingFailed(_)
            | PasswordError::VerificationFailed(_) => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => e.into(),
            AuthenticationError::TokenError(e) => e.into(),
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Internal(format!("Database error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_input_errors_stay_distinct() {
        let err: AuthError = PasswordError::EmptyPassword.into();
        assert!(matches!(err, AuthError::InvalidPassword(_)));

        let err: AuthError = PasswordError::HashingFailed("boom".to_string()).into();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_short_read_collapses_to_internal() {
        let err: AuthError = TokenError::ShortRead {
            requested: 256,
            actual: 10,
        }
        .into();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_invalid_credentials_preserved() {
        let err: AuthError = AuthenticationError::InvalidCredentials.into();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_database_error_collapses_to_internal() {
        let err: AuthError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
