use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::authorization::AuthorizationGate;
use crate::domain::errors::AuthError;
use crate::domain::principal::models::CreateManagerCommand;
use crate::domain::principal::models::Identifier;
use crate::domain::principal::models::NewPrincipal;
use crate::domain::principal::models::Password;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::Role;
use crate::domain::principal::ports::CredentialStore;
use crate::domain::principal::ports::ManagementServicePort;
use crate::domain::principal::service::hash_password;

/// Privileged operations over both principal populations.
///
/// Callers are always manager-kind principals; their role is resolved from the
/// manager store on every call.
pub struct ManagementService<S>
where
    S: CredentialStore,
{
    customers: Arc<S>,
    managers: Arc<S>,
    gate: AuthorizationGate<S>,
    authenticator: Arc<Authenticator>,
}

impl<S> ManagementService<S>
where
    S: CredentialStore,
{
    pub fn new(customers: Arc<S>, managers: Arc<S>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            customers,
            gate: AuthorizationGate::new(Arc::clone(&managers)),
            managers,
            authenticator,
        }
    }

    /// Create the initial admin account if its identifier is still free.
    ///
    /// Runs without authorization; only called from startup configuration.
    ///
    /// # Returns
    /// Created admin, or None when the identifier already exists
    pub async fn bootstrap_admin(
        &self,
        identifier: Identifier,
        password: Password,
    ) -> Result<Option<Principal>, AuthError> {
        if self.managers.find_by_identifier(&identifier).await?.is_some() {
            return Ok(None);
        }

        let password_hash = hash_password(&self.authenticator, &password).await?;

        match self
            .managers
            .insert_principal(NewPrincipal {
                identifier,
                password_hash,
                role: Role::Admin,
            })
            .await
        {
            Ok(admin) => {
                tracing::info!(principal_id = %admin.id, "Bootstrap admin created");
                Ok(Some(admin))
            }
            Err(AuthError::IdentifierConflict(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_customer_active(
        &self,
        caller: PrincipalId,
        customer: PrincipalId,
        active: bool,
    ) -> Result<Principal, AuthError> {
        self.gate.authorize(caller, Role::Manager).await?;

        let principal = self.customers.set_active(customer, active).await?;

        tracing::info!(
            caller = %caller,
            customer = %customer,
            active,
            "Customer activity changed"
        );

        Ok(principal)
    }
}

#[async_trait]
impl<S> ManagementServicePort for ManagementService<S>
where
    S: CredentialStore,
{
    async fn create_manager(
        &self,
        caller: PrincipalId,
        command: CreateManagerCommand,
    ) -> Result<Principal, AuthError> {
        self.gate.authorize(caller, Role::Admin).await?;

        if !command.role.is_manager_role() {
            return Err(AuthError::InvalidRole(command.role.to_string()));
        }

        let password_hash = hash_password(&self.authenticator, &command.password).await?;

        let manager = self
            .managers
            .insert_principal(NewPrincipal {
                identifier: command.identifier,
                password_hash,
                role: command.role,
            })
            .await?;

        tracing::info!(
            caller = %caller,
            principal_id = %manager.id,
            role = %manager.role,
            "Manager created"
        );

        Ok(manager)
    }

    async fn change_role(
        &self,
        caller: PrincipalId,
        target: PrincipalId,
        role: Role,
    ) -> Result<Principal, AuthError> {
        self.gate.authorize(caller, Role::Admin).await?;

        if !role.is_manager_role() {
            return Err(AuthError::InvalidRole(role.to_string()));
        }

        // Only another admin may demote an admin, so at least one always remains
        if caller == target && role != Role::Admin {
            return Err(AuthError::Forbidden);
        }

        let manager = self.managers.set_role(target, role).await?;

        tracing::info!(caller = %caller, target = %target, role = %role, "Role changed");

        Ok(manager)
    }

    async fn list_customers(
        &self,
        caller: PrincipalId,
        active_only: bool,
    ) -> Result<Vec<Principal>, AuthError> {
        self.gate.authorize(caller, Role::Manager).await?;
        self.customers.list_principals(active_only).await
    }

    async fn block_customer(
        &self,
        caller: PrincipalId,
        customer: PrincipalId,
    ) -> Result<Principal, AuthError> {
        self.set_customer_active(caller, customer, false).await
    }

    async fn unblock_customer(
        &self,
        caller: PrincipalId,
        customer: PrincipalId,
    ) -> Result<Principal, AuthError> {
        self.set_customer_active(caller, customer, true).await
    }

    async fn remove_customer(
        &self,
        caller: PrincipalId,
        customer: PrincipalId,
    ) -> Result<Principal, AuthError> {
        self.gate.authorize(caller, Role::Manager).await?;

        let removed = self.customers.remove_principal(customer).await?;

        tracing::info!(caller = %caller, customer = %customer, "Customer removed");

        Ok(removed)
    }
}
