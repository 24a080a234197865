use crate::password::HashingCost;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::TokenError;
use crate::token::TokenGenerator;

/// Authentication coordinator combining password verification and token generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and opaque token generation. Persisting tokens is left to
/// the caller.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_generator: TokenGenerator,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator with default hashing cost and OS entropy.
    pub fn new() -> Self {
        Self::with_parts(PasswordHasher::new(), TokenGenerator::new())
    }

    /// Create an authenticator with an explicit hashing cost.
    ///
    /// # Arguments
    /// * `cost` - Argon2id work factor
    ///
    /// # Errors
    /// * `InvalidParameters` - The cost is rejected by Argon2
    pub fn with_cost(cost: HashingCost) -> Result<Self, PasswordError> {
        Ok(Self::with_parts(
            PasswordHasher::with_cost(cost)?,
            TokenGenerator::new(),
        ))
    }

    /// Assemble an authenticator from prepared parts.
    pub fn with_parts(password_hasher: PasswordHasher, token_generator: TokenGenerator) -> Self {
        Self {
            password_hasher,
            token_generator,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Hashed password string
    ///
    /// # Errors
    /// * `PasswordError` - Input rejected or hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a plaintext password against its stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Generate a fresh opaque token.
    ///
    /// # Errors
    /// * `TokenError` - Entropy source failed or returned a short read
    pub fn generate_token(&self) -> Result<String, TokenError> {
        self.token_generator.generate()
    }
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new()
    }
}
