pub mod argon2;
pub mod errors;

pub use argon2::HashingCost;
pub use argon2::PasswordHasher;
pub use argon2::MAX_PASSWORD_BYTES;
pub use errors::PasswordError;
