use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;

use super::errors::TokenError;

/// Source of random bytes for token generation.
///
/// Implementations report how many bytes they actually wrote so callers can
/// refuse to build a token from a short read.
pub trait EntropySource: Send + Sync + 'static {
    /// Fill `buf` with random bytes.
    ///
    /// # Returns
    /// Number of bytes written into `buf`
    ///
    /// # Errors
    /// * `EntropyUnavailable` - The underlying source failed
    fn fill(&self, buf: &mut [u8]) -> Result<usize, TokenError>;
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<usize, TokenError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| TokenError::EntropyUnavailable(e.to_string()))?;

        Ok(buf.len())
    }
}
