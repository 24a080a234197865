//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id, tunable work factor)
//! - Opaque bearer token generation from a checked entropy source
//! - Authentication coordination
//!
//! Storage of principals and tokens is absent; each service owns its
//! persistence and adapts these primitives.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Opaque Tokens
//! ```
//! use auth::{TokenGenerator, TOKEN_LENGTH};
//!
//! let generator = TokenGenerator::new();
//! let token = generator.generate().unwrap();
//! assert_eq!(token.len(), TOKEN_LENGTH);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify, then mint a token for the caller to persist
//! auth.verify_credentials("password123", &hash).unwrap();
//! let token = auth.generate_token().unwrap();
//! println!("Token: {}", token);
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::MAX_PASSWORD_BYTES;
pub use token::EntropySource;
pub use token::OsEntropy;
pub use token::TokenError;
pub use token::TokenGenerator;
pub use token::TOKEN_BYTES;
pub use token::TOKEN_LENGTH;
