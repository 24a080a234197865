use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::errors::AuthError;
use crate::domain::errors::IdentifierError;

/// Principal aggregate entity.
///
/// Represents a registered customer or manager. The password hash never
/// leaves the service: there is no `Serialize` impl and `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub identifier: Identifier,
    pub password_hash: String,
    pub active: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("password_hash", &"<redacted>")
            .field("active", &self.active)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Principal unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrincipalId(pub i64);

impl PrincipalId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login identifier value type (phone number or login name).
///
/// Ensures the identifier is 1-64 characters without whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid identifier.
    ///
    /// # Arguments
    /// * `identifier` - Raw identifier string
    ///
    /// # Errors
    /// * `Empty` - Identifier is empty
    /// * `TooLong` - Identifier longer than 64 characters
    /// * `InvalidCharacters` - Contains whitespace or control characters
    pub fn new(identifier: String) -> Result<Self, IdentifierError> {
        let length = identifier.chars().count();
        if length == 0 {
            return Err(IdentifierError::Empty);
        }
        if length > Self::MAX_LENGTH {
            return Err(IdentifierError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if identifier
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(IdentifierError::InvalidCharacters);
        }
        Ok(Self(identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password as received from the caller.
///
/// `Debug` is redacted so commands carrying it can be traced.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Role carried by a principal.
///
/// Customers are always `Customer`; managers are `Manager` or `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Check if this role grants at least the capabilities of `required`.
    pub fn includes(&self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Manager => matches!(required, Role::Manager),
            Role::Customer => matches!(required, Role::Customer),
        }
    }

    /// Roles a manager-kind principal may hold.
    pub fn is_manager_role(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(AuthError::InvalidRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role lookup result used by authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: Role,
    pub active: bool,
}

/// Principal population a store or service works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    Customer,
    Manager,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Customer => "customer",
            PrincipalKind::Manager => "manager",
        }
    }

    /// Role given to principals of this kind on registration.
    pub fn default_role(&self) -> Role {
        match self {
            PrincipalKind::Customer => Role::Customer,
            PrincipalKind::Manager => Role::Manager,
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Principal ready to be inserted; the store assigns id and creation time.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPrincipal {
    pub identifier: Identifier,
    pub password_hash: String,
    pub role: Role,
}

impl fmt::Debug for NewPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPrincipal")
            .field("identifier", &self.identifier)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Command to register a new principal with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub identifier: Identifier,
    pub password: Password,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `identifier` - Validated identifier
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(identifier: Identifier, password: Password) -> Self {
        Self {
            identifier,
            password,
        }
    }
}

/// Command for an admin to create a manager-kind principal.
#[derive(Debug)]
pub struct CreateManagerCommand {
    pub identifier: Identifier,
    pub password: Password,
    pub role: Role,
}
