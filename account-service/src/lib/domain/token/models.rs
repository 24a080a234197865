use std::fmt;

use auth::TokenGenerator;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::errors::AuthError;
use crate::domain::errors::TokenTtlError;
use crate::domain::principal::models::PrincipalId;

/// Opaque bearer token value.
///
/// `Debug` is redacted; the value is a credential.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenValue(String);

impl TokenValue {
    /// Accept a caller-supplied token if it has the generated shape.
    ///
    /// # Returns
    /// `None` when the string cannot be a token this service issued
    pub fn parse(token: &str) -> Option<Self> {
        TokenGenerator::is_well_formed(token).then(|| Self(token.to_string()))
    }

    /// Wrap a freshly generated or stored value without shape checks.
    pub fn from_trusted(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenValue(<redacted>)")
    }
}

/// Session token bound to exactly one principal.
///
/// Immutable once issued; `expires_at` is always after `issued_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: TokenValue,
    pub owner_id: PrincipalId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Build a token valid for `ttl` from `issued_at`.
    ///
    /// # Errors
    /// * `Internal` - Expiry falls outside the representable date range
    pub fn new(
        value: TokenValue,
        owner_id: PrincipalId,
        issued_at: DateTime<Utc>,
        ttl: TokenTtl,
    ) -> Result<Self, AuthError> {
        let expires_at = issued_at
            .checked_add_signed(ttl.as_duration())
            .ok_or_else(|| AuthError::Internal("Token expiry out of range".to_string()))?;

        Ok(Self {
            value,
            owner_id,
            issued_at,
            expires_at,
        })
    }

    /// True once `now` has passed the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Fixed lifetime of an issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtl(Duration);

impl TokenTtl {
    /// Longest accepted lifetime: one year.
    pub const MAX_MINUTES: i64 = 365 * 24 * 60;

    /// # Errors
    /// * `NotPositive` - Duration is zero or negative
    /// * `TooLong` - Duration exceeds `MAX_MINUTES`
    pub fn new(ttl: Duration) -> Result<Self, TokenTtlError> {
        if ttl <= Duration::zero() {
            return Err(TokenTtlError::NotPositive(ttl.num_seconds()));
        }
        if ttl.num_minutes() > Self::MAX_MINUTES {
            return Err(TokenTtlError::TooLong {
                max: Self::MAX_MINUTES,
                actual: ttl.num_minutes(),
            });
        }
        Ok(Self(ttl))
    }

    pub fn from_minutes(minutes: i64) -> Result<Self, TokenTtlError> {
        let ttl = Duration::try_minutes(minutes).ok_or(TokenTtlError::TooLong {
            max: Self::MAX_MINUTES,
            actual: minutes,
        })?;
        Self::new(ttl)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}
