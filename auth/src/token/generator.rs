use super::entropy::EntropySource;
use super::entropy::OsEntropy;
use super::errors::TokenError;

/// Random bytes drawn per token.
pub const TOKEN_BYTES: usize = 256;

/// Length of an encoded token (hex, two characters per byte).
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Opaque bearer token generator.
///
/// Tokens carry no claims; they are random identifiers that only mean
/// something once persisted next to their owner and expiry.
pub struct TokenGenerator {
    source: Box<dyn EntropySource>,
}

impl TokenGenerator {
    /// Create a generator backed by the operating system CSPRNG.
    pub fn new() -> Self {
        Self::with_source(OsEntropy)
    }

    /// Create a generator backed by a custom entropy source.
    ///
    /// # Arguments
    /// * `source` - Entropy source to draw token bytes from
    pub fn with_source(source: impl EntropySource) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Generate a new opaque token.
    ///
    /// # Returns
    /// Lowercase hex string of `TOKEN_LENGTH` characters
    ///
    /// # Errors
    /// * `ShortRead` - Source produced fewer than `TOKEN_BYTES` bytes
    /// * `EntropyUnavailable` - Source failed
    pub fn generate(&self) -> Result<String, TokenError> {
        let mut buffer = vec![0u8; TOKEN_BYTES];

        let read = self.source.fill(&mut buffer)?;
        if read != TOKEN_BYTES {
            return Err(TokenError::ShortRead {
                requested: TOKEN_BYTES,
                actual: read,
            });
        }

        Ok(hex::encode(buffer))
    }

    /// Check whether a string has the shape of a generated token.
    pub fn is_well_formed(token: &str) -> bool {
        token.len() == TOKEN_LENGTH
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct ShortSource;

    impl EntropySource for ShortSource {
        fn fill(&self, buf: &mut [u8]) -> Result<usize, TokenError> {
            Ok(buf.len() / 2)
        }
    }

    struct BrokenSource;

    impl EntropySource for BrokenSource {
        fn fill(&self, _buf: &mut [u8]) -> Result<usize, TokenError> {
            Err(TokenError::EntropyUnavailable("device closed".to_string()))
        }
    }

    #[test]
    fn test_generate_has_fixed_length_and_hex_alphabet() {
        let generator = TokenGenerator::new();
        let token = generator.generate().expect("Failed to generate token");

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(TokenGenerator::is_well_formed(&token));
    }

    #[test]
    fn test_generated_tokens_are_distinct() {
        let generator = TokenGenerator::new();
        let mut seen = HashSet::new();

        for _ in 0..50_000 {
            let token = generator.generate().unwrap();
            assert!(seen.insert(token), "duplicate token generated");
        }
    }

    #[test]
    #[ignore = "slow: draws a million tokens"]
    fn test_million_tokens_are_distinct() {
        let generator = TokenGenerator::new();
        let mut seen = HashSet::with_capacity(1_000_000);

        for _ in 0..1_000_000 {
            let token = generator.generate().unwrap();
            // A 128-bit prefix collision would already be a failure
            assert!(seen.insert(token[..32].to_string()));
        }
    }

    #[test]
    fn test_short_read_is_rejected() {
        let generator = TokenGenerator::with_source(ShortSource);

        assert_eq!(
            generator.generate(),
            Err(TokenError::ShortRead {
                requested: TOKEN_BYTES,
                actual: TOKEN_BYTES / 2,
            })
        );
    }

    #[test]
    fn test_source_failure_propagates() {
        let generator = TokenGenerator::with_source(BrokenSource);
        assert!(matches!(
            generator.generate(),
            Err(TokenError::EntropyUnavailable(_))
        ));
    }

    #[test]
    fn test_is_well_formed() {
        assert!(TokenGenerator::is_well_formed(&"ab".repeat(TOKEN_BYTES)));
        assert!(!TokenGenerator::is_well_formed("abc"));
        assert!(!TokenGenerator::is_well_formed(&"AB".repeat(TOKEN_BYTES)));
        assert!(!TokenGenerator::is_well_formed(&"zz".repeat(TOKEN_BYTES)));
    }
}
