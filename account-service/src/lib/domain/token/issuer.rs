use std::sync::Arc;

use auth::Authenticator;
use chrono::Utc;

use crate::domain::errors::AuthError;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::ports::CredentialStore;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenTtl;
use crate::domain::token::models::TokenValue;

/// Mints opaque tokens and persists them with their owner and expiry.
pub struct TokenIssuer<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
    ttl: TokenTtl,
}

impl<S> TokenIssuer<S>
where
    S: CredentialStore,
{
    /// # Arguments
    /// * `store` - Store the issued tokens are written to
    /// * `authenticator` - Source of token values
    /// * `ttl` - Lifetime given to every token
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>, ttl: TokenTtl) -> Self {
        Self {
            store,
            authenticator,
            ttl,
        }
    }

    /// Issue a fresh token for `owner_id`.
    ///
    /// No retry is attempted; calling again simply issues another token.
    ///
    /// # Errors
    /// * `Internal` - Entropy short read, expiry out of range or store write failure
    pub async fn issue(&self, owner_id: PrincipalId) -> Result<Token, AuthError> {
        let value = TokenValue::from_trusted(self.authenticator.generate_token()?);
        let token = Token::new(value, owner_id, Utc::now(), self.ttl)?;

        self.store.insert_token(&token).await?;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use auth::EntropySource;
    use auth::PasswordHasher;
    use auth::TokenError;
    use auth::TokenGenerator;
    use auth::TOKEN_LENGTH;

    use super::*;
    use crate::domain::principal::ports::mocks::MockTestCredentialStore;

    struct ShortSource;

    impl EntropySource for ShortSource {
        fn fill(&self, buf: &mut [u8]) -> Result<usize, TokenError> {
            Ok(buf.len() - 1)
        }
    }

    fn ttl() -> TokenTtl {
        TokenTtl::from_minutes(60).unwrap()
    }

    #[tokio::test]
    async fn test_issue_persists_token() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_insert_token()
            .withf(|token| {
                token.owner_id == PrincipalId(42)
                    && token.value.as_str().len() == TOKEN_LENGTH
                    && token.expires_at - token.issued_at == chrono::Duration::minutes(60)
            })
            .times(1)
            .returning(|_| Ok(()));

        let issuer = TokenIssuer::new(Arc::new(store), Arc::new(Authenticator::new()), ttl());

        let token = issuer.issue(PrincipalId(42)).await.unwrap();
        assert_eq!(token.owner_id, PrincipalId(42));
        assert!(token.expires_at > token.issued_at);
    }

    #[tokio::test]
    async fn test_issue_short_read_never_reaches_store() {
        let mut store = MockTestCredentialStore::new();
        store.expect_insert_token().times(0);

        let authenticator = Authenticator::with_parts(
            PasswordHasher::new(),
            TokenGenerator::with_source(ShortSource),
        );
        let issuer = TokenIssuer::new(Arc::new(store), Arc::new(authenticator), ttl());

        let result = issuer.issue(PrincipalId(1)).await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test]
    async fn test_issue_store_failure_is_internal() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_insert_token()
            .times(1)
            .returning(|_| Err(AuthError::Internal("connection reset".to_string())));

        let issuer = TokenIssuer::new(Arc::new(store), Arc::new(Authenticator::new()), ttl());

        let result = issuer.issue(PrincipalId(1)).await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test]
    async fn test_consecutive_tokens_differ() {
        let mut store = MockTestCredentialStore::new();
        store.expect_insert_token().times(2).returning(|_| Ok(()));

        let issuer = TokenIssuer::new(Arc::new(store), Arc::new(Authenticator::new()), ttl());

        let first = issuer.issue(PrincipalId(1)).await.unwrap();
        let second = issuer.issue(PrincipalId(1)).await.unwrap();
        assert_ne!(first.value, second.value);
    }
}
