use std::sync::Arc;

use crate::domain::errors::AuthError;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::Role;
use crate::domain::principal::ports::CredentialStore;

/// Role check in front of privileged operations.
///
/// Fail-closed: a principal that cannot be resolved or is inactive is never
/// authorized, whatever role it carries.
pub struct AuthorizationGate<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
}

impl<S> AuthorizationGate<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Require `principal_id` to hold a role including `required`.
    ///
    /// # Errors
    /// * `Forbidden` - Principal unknown, inactive, or lacking the role
    /// * `Internal` - Store failure
    pub async fn authorize(
        &self,
        principal_id: PrincipalId,
        required: Role,
    ) -> Result<(), AuthError> {
        let assignment = self
            .store
            .find_role(principal_id)
            .await?
            .ok_or(AuthError::Forbidden)?;

        if assignment.active && assignment.role.includes(required) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// Boolean form of [`authorize`](Self::authorize).
    ///
    /// # Errors
    /// * `Internal` - Store failure
    pub async fn is_authorized(
        &self,
        principal_id: PrincipalId,
        required: Role,
    ) -> Result<bool, AuthError> {
        match self.authorize(principal_id, required).await {
            Ok(()) => Ok(true),
            Err(AuthError::Forbidden) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
