use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use tokio::sync::OnceCell;

use crate::domain::errors::AuthError;
use crate::domain::principal::models::Identifier;
use crate::domain::principal::models::NewPrincipal;
use crate::domain::principal::models::Password;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::PrincipalKind;
use crate::domain::principal::models::RegisterCommand;
use crate::domain::principal::ports::AccountServicePort;
use crate::domain::principal::ports::CredentialStore;
use crate::domain::token::issuer::TokenIssuer;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenTtl;
use crate::domain::token::validator::TokenValidator;

/// Domain service implementation for account operations of one principal kind.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<S>
where
    S: CredentialStore,
{
    kind: PrincipalKind,
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
    issuer: TokenIssuer<S>,
    validator: TokenValidator<S>,
    /// Hash checked when the identifier is unknown, so both login paths pay for Argon2
    decoy_hash: OnceCell<String>,
}

impl<S> AccountService<S>
where
    S: CredentialStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `kind` - Principal population served
    /// * `store` - Credential persistence for that population
    /// * `authenticator` - Password hashing and token generation
    /// * `ttl` - Lifetime of issued tokens
    pub fn new(
        kind: PrincipalKind,
        store: Arc<S>,
        authenticator: Arc<Authenticator>,
        ttl: TokenTtl,
    ) -> Self {
        Self {
            kind,
            issuer: TokenIssuer::new(Arc::clone(&store), Arc::clone(&authenticator), ttl),
            validator: TokenValidator::new(Arc::clone(&store)),
            store,
            authenticator,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Burn one verification against the decoy hash.
    ///
    /// The outcome is ignored; only the elapsed work matters.
    async fn verify_decoy(&self, password: &Password) -> Result<(), AuthError> {
        let decoy_hash = self
            .decoy_hash
            .get_or_try_init(|| async {
                let decoy = Password::new(DECOY_PASSWORD.to_string());
                hash_password(&self.authenticator, &decoy).await
            })
            .await?;

        let _ = verify_password(&self.authenticator, password, decoy_hash).await;

        Ok(())
    }
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-identifiers";

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<Principal, AuthError> {
        let password_hash = hash_password(&self.authenticator, &command.password).await?;

        let principal = self
            .store
            .insert_principal(NewPrincipal {
                identifier: command.identifier,
                password_hash,
                role: self.kind.default_role(),
            })
            .await?;

        tracing::info!(
            kind = %self.kind,
            principal_id = %principal.id,
            "Principal registered"
        );

        Ok(principal)
    }

    async fn login(
        &self,
        identifier: &Identifier,
        password: &Password,
    ) -> Result<Token, AuthError> {
        let Some(principal) = self.store.find_by_identifier(identifier).await? else {
            self.verify_decoy(password).await?;
            return Err(AuthError::NotFound(identifier.to_string()));
        };

        verify_password(&self.authenticator, password, &principal.password_hash).await?;

        if !principal.active {
            return Err(AuthError::Forbidden);
        }

        let token = self.issuer.issue(principal.id).await?;

        tracing::info!(
            kind = %self.kind,
            principal_id = %principal.id,
            expires_at = %token.expires_at,
            "Token issued"
        );

        Ok(token)
    }

    async fn authenticate(&self, token: &str) -> Result<PrincipalId, AuthError> {
        let id = self.validator.validate(token).await?;

        // Tokens issued before a block stop working immediately
        match self.store.find_role(id).await? {
            Some(assignment) if assignment.active => Ok(id),
            Some(_) => Err(AuthError::Forbidden),
            None => Err(AuthError::TokenNotFound),
        }
    }

    async fn get_principal(&self, id: PrincipalId) -> Result<Principal, AuthError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound(id.to_string()))
    }
}

/// Hash on the blocking pool; Argon2 holds its thread for the whole computation.
pub(crate) async fn hash_password(
    authenticator: &Arc<Authenticator>,
    password: &Password,
) -> Result<String, AuthError> {
    let authenticator = Arc::clone(authenticator);
    let password = password.clone();

    tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
        .await
        .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(AuthError::from)
}

pub(crate) async fn verify_password(
    authenticator: &Arc<Authenticator>,
    password: &Password,
    stored_hash: &str,
) -> Result<(), AuthError> {
    let authenticator = Arc::clone(authenticator);
    let password = password.clone();
    let stored_hash = stored_hash.to_string();

    tokio::task::spawn_blocking(move || {
        authenticator.verify_credentials(password.expose(), &stored_hash)
    })
    .await
    .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?
    .map_err(AuthError::from)
}

#[cfg(test)]
mod tests {
    use auth::HashingCost;
    use auth::TOKEN_LENGTH;
    use chrono::Utc;

    use super::*;
    use crate::domain::principal::models::Role;
    use crate::domain::principal::models::RoleAssignment;
    use crate::domain::token::models::TokenValue;
    use crate::domain::principal::ports::mocks::MockTestCredentialStore;

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::with_cost(HashingCost {
                memory_kib: 256,
                iterations: 1,
                parallelism: 1,
            })
            .unwrap(),
        )
    }

    fn service(
        store: MockTestCredentialStore,
        authenticator: Arc<Authenticator>,
    ) -> AccountService<MockTestCredentialStore> {
        AccountService::new(
            PrincipalKind::Customer,
            Arc::new(store),
            authenticator,
            TokenTtl::from_minutes(60).unwrap(),
        )
    }

    fn identifier(value: &str) -> Identifier {
        Identifier::new(value.to_string()).unwrap()
    }

    fn password(value: &str) -> Password {
        Password::new(value.to_string())
    }

    fn stored_principal(authenticator: &Authenticator, active: bool) -> Principal {
        Principal {
            id: PrincipalId(17),
            identifier: identifier("+1000"),
            password_hash: authenticator.hash_password("secret1").unwrap(),
            active,
            role: Role::Customer,
            created_at: Utc::now(),
        }
    }

    fn created_from(new: NewPrincipal) -> Principal {
        Principal {
            id: PrincipalId(17),
            identifier: new.identifier,
            password_hash: new.password_hash,
            active: true,
            role: new.role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_insert_principal()
            .withf(|new| {
                new.identifier.as_str() == "+1000"
                    && new.password_hash != "secret1"
                    && new.password_hash.starts_with("$argon2id")
                    && new.role == Role::Customer
            })
            .times(1)
            .returning(|new| Ok(created_from(new)));

        let service = service(store, authenticator());

        let principal = service
            .register(RegisterCommand::new(identifier("+1000"), password("secret1")))
            .await
            .unwrap();

        assert_eq!(principal.id, PrincipalId(17));
        assert_eq!(principal.role, Role::Customer);
        assert_ne!(principal.password_hash, "secret1");
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_insert_principal()
            .times(1)
            .returning(|new| Err(AuthError::IdentifierConflict(new.identifier.to_string())));

        let service = service(store, authenticator());

        let result = service
            .register(RegisterCommand::new(identifier("+1000"), password("secret1")))
            .await;
        assert!(matches!(result, Err(AuthError::IdentifierConflict(_))));
    }

    #[tokio::test]
    async fn test_register_empty_password_never_reaches_store() {
        let mut store = MockTestCredentialStore::new();
        store.expect_insert_principal().times(0);

        let service = service(store, authenticator());

        let result = service
            .register(RegisterCommand::new(identifier("+1000"), password("")))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidPassword(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = authenticator();
        let principal = stored_principal(&authenticator, true);
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_by_identifier()
            .withf(|id| id.as_str() == "+1000")
            .times(1)
            .returning(move |_| Ok(Some(principal.clone())));
        store
            .expect_insert_token()
            .withf(|token| token.owner_id == PrincipalId(17))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(store, authenticator);

        let token = service
            .login(&identifier("+1000"), &password("secret1"))
            .await
            .unwrap();

        assert_eq!(token.owner_id, PrincipalId(17));
        assert_eq!(token.value.as_str().len(), TOKEN_LENGTH);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = authenticator();
        let principal = stored_principal(&authenticator, true);
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(principal.clone())));
        store.expect_insert_token().times(0);

        let service = service(store, authenticator);

        let result = service
            .login(&identifier("+1000"), &password("wrong"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_identifier() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_identifier()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(store, authenticator());

        let result = service
            .login(&identifier("+2000"), &password("secret1"))
            .await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_identifier_still_verifies() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_identifier()
            .times(2)
            .returning(|_| Ok(None));
        store.expect_insert_token().times(0);

        let service = service(store, authenticator());
        assert!(service.decoy_hash.get().is_none());

        let result = service
            .login(&identifier("+2000"), &password("secret1"))
            .await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));

        let decoy_hash = service.decoy_hash.get().cloned().unwrap();
        assert!(decoy_hash.starts_with("$argon2id"));

        // Built once, reused on later misses
        let result = service
            .login(&identifier("+2001"), &password(DECOY_PASSWORD))
            .await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
        assert_eq!(service.decoy_hash.get(), Some(&decoy_hash));
    }

    #[tokio::test]
    async fn test_login_blocked_principal() {
        let authenticator = authenticator();
        let principal = stored_principal(&authenticator, false);
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(principal.clone())));
        store.expect_insert_token().times(0);

        let service = service(store, authenticator);

        let result = service
            .login(&identifier("+1000"), &password("secret1"))
            .await;
        assert!(matches!(result, Err(AuthError::Forbidden)));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_token() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_token().times(1).returning(|_| Ok(None));

        let service = service(store, authenticator());

        let token = "ab".repeat(auth::TOKEN_BYTES);
        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(AuthError::TokenNotFound)));
    }

    fn live_token(owner_id: PrincipalId) -> Token {
        Token::new(
            TokenValue::from_trusted("ab".repeat(auth::TOKEN_BYTES)),
            owner_id,
            Utc::now(),
            TokenTtl::from_minutes(5).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_active_principal() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_token()
            .times(1)
            .returning(|_| Ok(Some(live_token(PrincipalId(17)))));
        store
            .expect_find_role()
            .withf(|id| *id == PrincipalId(17))
            .times(1)
            .returning(|_| {
                Ok(Some(RoleAssignment {
                    role: Role::Customer,
                    active: true,
                }))
            });

        let service = service(store, authenticator());

        let id = service
            .authenticate(&"ab".repeat(auth::TOKEN_BYTES))
            .await
            .unwrap();
        assert_eq!(id, PrincipalId(17));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_blocked_principal() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_token()
            .times(1)
            .returning(|_| Ok(Some(live_token(PrincipalId(17)))));
        store.expect_find_role().times(1).returning(|_| {
            Ok(Some(RoleAssignment {
                role: Role::Customer,
                active: false,
            }))
        });

        let service = service(store, authenticator());

        let result = service.authenticate(&"ab".repeat(auth::TOKEN_BYTES)).await;
        assert!(matches!(result, Err(AuthError::Forbidden)));
    }

    #[tokio::test]
    async fn test_get_principal_not_found() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = service(store, authenticator());

        let result = service.get_principal(PrincipalId(404)).await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }
}
