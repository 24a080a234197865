use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::errors::AuthError;
use crate::domain::principal::models::Identifier;
use crate::domain::principal::models::NewPrincipal;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::PrincipalKind;
use crate::domain::principal::models::Role;
use crate::domain::principal::models::RoleAssignment;
use crate::domain::principal::ports::CredentialStore;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenValue;

/// PostgreSQL credential store for one principal kind.
///
/// Customers live in `customers`/`customers_tokens`, managers in
/// `managers`/`managers_tokens`. Every query is bounded by `query_timeout`.
pub struct PostgresCredentialStore {
    pool: PgPool,
    kind: PrincipalKind,
    query_timeout: Duration,
}

#[derive(FromRow)]
struct PrincipalRow {
    id: i64,
    identifier: String,
    password_hash: String,
    active: bool,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PrincipalRow> for Principal {
    type Error = AuthError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        let identifier = Identifier::new(row.identifier).map_err(|e| {
            AuthError::Internal(format!("Corrupt identifier in row {}: {}", row.id, e))
        })?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| AuthError::Internal(format!("Corrupt role in row {}: {}", row.id, e)))?;

        Ok(Principal {
            id: PrincipalId(row.id),
            identifier,
            password_hash: row.password_hash,
            active: row.active,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct TokenRow {
    token: String,
    owner_id: i64,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<TokenRow> for Token {
    fn from(row: TokenRow) -> Self {
        Token {
            value: TokenValue::from_trusted(row.token),
            owner_id: PrincipalId(row.owner_id),
            issued_at: row.issued_at,
            expires_at: row.expires_at,
        }
    }
}

const PRINCIPAL_COLUMNS: &str = "id, identifier, password_hash, active, role, created_at";

impl PostgresCredentialStore {
    pub fn new(pool: PgPool, kind: PrincipalKind, query_timeout: Duration) -> Self {
        Self {
            pool,
            kind,
            query_timeout,
        }
    }

    fn principals_table(&self) -> &'static str {
        match self.kind {
            PrincipalKind::Customer => "customers",
            PrincipalKind::Manager => "managers",
        }
    }

    fn tokens_table(&self) -> &'static str {
        match self.kind {
            PrincipalKind::Customer => "customers_tokens",
            PrincipalKind::Manager => "managers_tokens",
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::Internal(format!(
                "{} on {} timed out after {} ms",
                operation,
                self.principals_table(),
                self.query_timeout.as_millis()
            ))),
        }
    }

    async fn fetch_principal(
        &self,
        operation: &'static str,
        sql: String,
        id: PrincipalId,
    ) -> Result<Option<Principal>, AuthError> {
        let row = self
            .bounded(
                operation,
                sqlx::query_as::<_, PrincipalRow>(&sql)
                    .bind(id.as_i64())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Principal::try_from).transpose()
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Principal>, AuthError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE identifier = $1",
            PRINCIPAL_COLUMNS,
            self.principals_table()
        );

        let row = self
            .bounded(
                "find_by_identifier",
                sqlx::query_as::<_, PrincipalRow>(&sql)
                    .bind(identifier.as_str())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Principal::try_from).transpose()
    }

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, AuthError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            PRINCIPAL_COLUMNS,
            self.principals_table()
        );

        self.fetch_principal("find_by_id", sql, id).await
    }

    async fn insert_principal(&self, principal: NewPrincipal) -> Result<Principal, AuthError> {
        let sql = format!(
            r#"
            INSERT INTO {} (identifier, password_hash, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (identifier) DO NOTHING
            RETURNING {}
            "#,
            self.principals_table(),
            PRINCIPAL_COLUMNS
        );

        let row = self
            .bounded(
                "insert_principal",
                sqlx::query_as::<_, PrincipalRow>(&sql)
                    .bind(principal.identifier.as_str())
                    .bind(&principal.password_hash)
                    .bind(principal.role.as_str())
                    .fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some(row) => Principal::try_from(row),
            None => Err(AuthError::IdentifierConflict(
                principal.identifier.to_string(),
            )),
        }
    }

    async fn insert_token(&self, token: &Token) -> Result<(), AuthError> {
        // The owner's expired tokens are pruned in the same statement
        let sql = format!(
            r#"
            WITH pruned AS (
                DELETE FROM {table} WHERE owner_id = $2 AND expires_at < $3
            )
            INSERT INTO {table} (token, owner_id, issued_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
            table = self.tokens_table()
        );

        self.bounded(
            "insert_token",
            sqlx::query(&sql)
                .bind(token.value.as_str())
                .bind(token.owner_id.as_i64())
                .bind(token.issued_at)
                .bind(token.expires_at)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_token(&self, value: &TokenValue) -> Result<Option<Token>, AuthError> {
        let sql = format!(
            "SELECT token, owner_id, issued_at, expires_at FROM {} WHERE token = $1",
            self.tokens_table()
        );

        let row = self
            .bounded(
                "find_token",
                sqlx::query_as::<_, TokenRow>(&sql)
                    .bind(value.as_str())
                    .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(Token::from))
    }

    async fn find_role(&self, id: PrincipalId) -> Result<Option<RoleAssignment>, AuthError> {
        Ok(self
            .find_by_id(id)
            .await?
            .map(|principal| RoleAssignment {
                role: principal.role,
                active: principal.active,
            }))
    }

    async fn list_principals(&self, active_only: bool) -> Result<Vec<Principal>, AuthError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE active OR NOT $1 ORDER BY id",
            PRINCIPAL_COLUMNS,
            self.principals_table()
        );

        let rows = self
            .bounded(
                "list_principals",
                sqlx::query_as::<_, PrincipalRow>(&sql)
                    .bind(active_only)
                    .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter().map(Principal::try_from).collect()
    }

    async fn set_active(&self, id: PrincipalId, active: bool) -> Result<Principal, AuthError> {
        let sql = format!(
            "UPDATE {} SET active = $2 WHERE id = $1 RETURNING {}",
            self.principals_table(),
            PRINCIPAL_COLUMNS
        );

        let row = self
            .bounded(
                "set_active",
                sqlx::query_as::<_, PrincipalRow>(&sql)
                    .bind(id.as_i64())
                    .bind(active)
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Principal::try_from)
            .transpose()?
            .ok_or(AuthError::NotFound(id.to_string()))
    }

    async fn set_role(&self, id: PrincipalId, role: Role) -> Result<Principal, AuthError> {
        let sql = format!(
            "UPDATE {} SET role = $2 WHERE id = $1 RETURNING {}",
            self.principals_table(),
            PRINCIPAL_COLUMNS
        );

        let row = self
            .bounded(
                "set_role",
                sqlx::query_as::<_, PrincipalRow>(&sql)
                    .bind(id.as_i64())
                    .bind(role.as_str())
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Principal::try_from)
            .transpose()?
            .ok_or(AuthError::NotFound(id.to_string()))
    }

    async fn remove_principal(&self, id: PrincipalId) -> Result<Principal, AuthError> {
        // Tokens go with the row through ON DELETE CASCADE.
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            self.principals_table(),
            PRINCIPAL_COLUMNS
        );

        self.fetch_principal("remove_principal", sql, id)
            .await?
            .ok_or(AuthError::NotFound(id.to_string()))
    }
}
