use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::errors::AuthError;
use crate::domain::principal::models::Identifier;
use crate::domain::principal::models::NewPrincipal;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::Role;
use crate::domain::principal::models::RoleAssignment;
use crate::domain::principal::ports::CredentialStore;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenValue;

/// Process-local credential store for one principal kind.
///
/// Same uniqueness and cascade rules as the PostgreSQL tables; contents are
/// lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    /// Map of id -> principal, ordered for listing
    principals: BTreeMap<PrincipalId, Principal>,
    /// Map of identifier -> id for login lookups
    identifiers: HashMap<Identifier, PrincipalId>,
    tokens: HashMap<TokenValue, Token>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: PrincipalId, apply: F) -> Result<Principal, AuthError>
    where
        F: FnOnce(&mut Principal) + Send,
    {
        let mut state = self.state.write().await;
        let principal = state
            .principals
            .get_mut(&id)
            .ok_or(AuthError::NotFound(id.to_string()))?;

        apply(principal);

        Ok(principal.clone())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Principal>, AuthError> {
        let state = self.state.read().await;
        Ok(state
            .identifiers
            .get(identifier)
            .and_then(|id| state.principals.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, AuthError> {
        Ok(self.state.read().await.principals.get(&id).cloned())
    }

    async fn insert_principal(&self, principal: NewPrincipal) -> Result<Principal, AuthError> {
        let mut state = self.state.write().await;

        if state.identifiers.contains_key(&principal.identifier) {
            return Err(AuthError::IdentifierConflict(
                principal.identifier.to_string(),
            ));
        }

        state.last_id += 1;
        let id = PrincipalId(state.last_id);
        let created = Principal {
            id,
            identifier: principal.identifier,
            password_hash: principal.password_hash,
            active: true,
            role: principal.role,
            created_at: Utc::now(),
        };

        state.identifiers.insert(created.identifier.clone(), id);
        state.principals.insert(id, created.clone());

        Ok(created)
    }

    async fn insert_token(&self, token: &Token) -> Result<(), AuthError> {
        let mut state = self.state.write().await;

        if !state.principals.contains_key(&token.owner_id) {
            return Err(AuthError::Internal(format!(
                "Token owner {} does not exist",
                token.owner_id
            )));
        }
        if state.tokens.contains_key(&token.value) {
            return Err(AuthError::Internal("Duplicate token value".to_string()));
        }

        state.tokens.retain(|_, existing| {
            existing.owner_id != token.owner_id || !existing.is_expired_at(token.issued_at)
        });
        state.tokens.insert(token.value.clone(), token.clone());

        Ok(())
    }

    async fn find_token(&self, value: &TokenValue) -> Result<Option<Token>, AuthError> {
        Ok(self.state.read().await.tokens.get(value).cloned())
    }

    async fn find_role(&self, id: PrincipalId) -> Result<Option<RoleAssignment>, AuthError> {
        Ok(self
            .state
            .read()
            .await
            .principals
            .get(&id)
            .map(|principal| RoleAssignment {
                role: principal.role,
                active: principal.active,
            }))
    }

    async fn list_principals(&self, active_only: bool) -> Result<Vec<Principal>, AuthError> {
        Ok(self
            .state
            .read()
            .await
            .principals
            .values()
            .filter(|principal| principal.active || !active_only)
            .cloned()
            .collect())
    }

    async fn set_active(&self, id: PrincipalId, active: bool) -> Result<Principal, AuthError> {
        self.update(id, |principal| principal.active = active).await
    }

    async fn set_role(&self, id: PrincipalId, role: Role) -> Result<Principal, AuthError> {
        self.update(id, |principal| principal.role = role).await
    }

    async fn remove_principal(&self, id: PrincipalId) -> Result<Principal, AuthError> {
        let mut state = self.state.write().await;

        let removed = state
            .principals
            .remove(&id)
            .ok_or(AuthError::NotFound(id.to_string()))?;

        state.identifiers.remove(&removed.identifier);
        state.tokens.retain(|_, token| token.owner_id != id);

        Ok(removed)
    }
}
