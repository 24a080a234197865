use async_trait::async_trait;

use crate::domain::errors::AuthError;
use crate::domain::principal::models::CreateManagerCommand;
use crate::domain::principal::models::Identifier;
use crate::domain::principal::models::NewPrincipal;
use crate::domain::principal::models::Password;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::RegisterCommand;
use crate::domain::principal::models::Role;
use crate::domain::principal::models::RoleAssignment;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenValue;

/// Port for per-kind account operations (registration, login, token resolution).
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new principal.
    ///
    /// # Arguments
    /// * `command` - Validated identifier and plaintext password
    ///
    /// # Returns
    /// Created principal
    ///
    /// # Errors
    /// * `IdentifierConflict` - Identifier is already registered
    /// * `InvalidPassword` - Password empty or oversized
    /// * `Internal` - Hashing or store failure
    async fn register(&self, command: RegisterCommand) -> Result<Principal, AuthError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    /// * `NotFound` - No principal with this identifier
    /// * `InvalidCredentials` - Password does not match
    /// * `Forbidden` - Principal is blocked
    /// * `Internal` - Randomness or store failure
    async fn login(&self, identifier: &Identifier, password: &Password)
        -> Result<Token, AuthError>;

    /// Resolve a bearer token to its owner.
    ///
    /// # Errors
    /// * `TokenNotFound` - Token unknown or malformed
    /// * `TokenExpired` - Token past its expiry
    /// * `Forbidden` - Owner has been blocked since the token was issued
    /// * `Internal` - Store failure
    async fn authenticate(&self, token: &str) -> Result<PrincipalId, AuthError>;

    /// Retrieve principal by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `Internal` - Store failure
    async fn get_principal(&self, id: PrincipalId) -> Result<Principal, AuthError>;
}

/// Port for privileged operations performed by managers and admins.
///
/// Every operation takes the calling manager's id and is authorized before it runs.
#[async_trait]
pub trait ManagementServicePort: Send + Sync + 'static {
    /// Create a manager-kind principal. Admin only.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an active admin
    /// * `InvalidRole` - Requested role is not a manager role
    /// * `IdentifierConflict` - Identifier is already registered
    async fn create_manager(
        &self,
        caller: PrincipalId,
        command: CreateManagerCommand,
    ) -> Result<Principal, AuthError>;

    /// Change a manager's role. Admin only.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an active admin, or is demoting itself
    /// * `InvalidRole` - Requested role is not a manager role
    /// * `NotFound` - Target manager does not exist
    async fn change_role(
        &self,
        caller: PrincipalId,
        target: PrincipalId,
        role: Role,
    ) -> Result<Principal, AuthError>;

    /// List customers, optionally only active ones.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an active manager
    async fn list_customers(
        &self,
        caller: PrincipalId,
        active_only: bool,
    ) -> Result<Vec<Principal>, AuthError>;

    /// Block a customer.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an active manager
    /// * `NotFound` - Customer does not exist
    async fn block_customer(
        &self,
        caller: PrincipalId,
        customer: PrincipalId,
    ) -> Result<Principal, AuthError>;

    /// Unblock a customer.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an active manager
    /// * `NotFound` - Customer does not exist
    async fn unblock_customer(
        &self,
        caller: PrincipalId,
        customer: PrincipalId,
    ) -> Result<Principal, AuthError>;

    /// Remove a customer and its tokens.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an active manager
    /// * `NotFound` - Customer does not exist
    async fn remove_customer(
        &self,
        caller: PrincipalId,
        customer: PrincipalId,
    ) -> Result<Principal, AuthError>;
}

/// Persistence boundary for principals and their tokens.
///
/// One store serves one principal kind. Uniqueness of identifiers and token
/// values is enforced by the store itself, never by a read-then-write in the
/// caller. Transport failures surface as `Internal`.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve principal by login identifier.
    ///
    /// # Returns
    /// Optional principal (None if not found)
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Principal>, AuthError>;

    /// Retrieve principal by id.
    ///
    /// # Returns
    /// Optional principal (None if not found)
    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, AuthError>;

    /// Persist a new principal.
    ///
    /// # Errors
    /// * `IdentifierConflict` - Identifier is already taken
    async fn insert_principal(&self, principal: NewPrincipal) -> Result<Principal, AuthError>;

    /// Persist an issued token.
    async fn insert_token(&self, token: &Token) -> Result<(), AuthError>;

    /// Retrieve a token by value.
    ///
    /// # Returns
    /// Optional token (None if not found)
    async fn find_token(&self, value: &TokenValue) -> Result<Option<Token>, AuthError>;

    /// Retrieve role and activity flag of a principal.
    ///
    /// # Returns
    /// Optional role assignment (None if not found)
    async fn find_role(&self, id: PrincipalId) -> Result<Option<RoleAssignment>, AuthError>;

    /// Retrieve all principals ordered by id.
    async fn list_principals(&self, active_only: bool) -> Result<Vec<Principal>, AuthError>;

    /// Set the active flag.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    async fn set_active(&self, id: PrincipalId, active: bool) -> Result<Principal, AuthError>;

    /// Replace the role.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    async fn set_role(&self, id: PrincipalId, role: Role) -> Result<Principal, AuthError>;

    /// Delete a principal together with its tokens.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    async fn remove_principal(&self, id: PrincipalId) -> Result<Principal, AuthError>;
}
