use std::sync::Arc;

use chrono::Utc;

use crate::domain::errors::AuthError;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::ports::CredentialStore;
use crate::domain::token::models::TokenValue;

/// Resolves bearer tokens to their owner, enforcing expiry.
///
/// Read-only: validation never extends a token's lifetime.
pub struct TokenValidator<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
}

impl<S> TokenValidator<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve `token` to the id of the principal it was issued to.
    ///
    /// # Errors
    /// * `TokenNotFound` - Token is malformed or unknown
    /// * `TokenExpired` - Current time is past the token's expiry
    /// * `Internal` - Store failure
    pub async fn validate(&self, token: &str) -> Result<PrincipalId, AuthError> {
        let value = TokenValue::parse(token).ok_or(AuthError::TokenNotFound)?;

        let token = self
            .store
            .find_token(&value)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if token.is_expired_at(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(token.owner_id)
    }
}
