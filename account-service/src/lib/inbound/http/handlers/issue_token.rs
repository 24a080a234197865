use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::errors::AuthError;
use crate::domain::principal::models::Identifier;
use crate::domain::principal::models::Password;
use crate::domain::principal::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn issue_customer_token(
    State(state): State<AppState>,
    Json(body): Json<IssueTokenRequestBody>,
) -> Result<ApiSuccess<IssueTokenResponseData>, ApiError> {
    issue_token(&state.customers, body).await
}

pub async fn issue_manager_token(
    State(state): State<AppState>,
    Json(body): Json<IssueTokenRequestBody>,
) -> Result<ApiSuccess<IssueTokenResponseData>, ApiError> {
    issue_token(&state.managers, body).await
}

async fn issue_token(
    service: &Arc<dyn AccountServicePort>,
    body: IssueTokenRequestBody,
) -> Result<ApiSuccess<IssueTokenResponseData>, ApiError> {
    // A malformed identifier cannot belong to anyone
    let identifier =
        Identifier::new(body.identifier).map_err(|_| ApiError::invalid_credentials())?;
    let password = Password::new(body.password);

    let token = service
        .login(&identifier, &password)
        .await
        .map_err(|e| match e {
            AuthError::NotFound(_) | AuthError::InvalidCredentials => {
                tracing::debug!(error = %e, "Login rejected");
                ApiError::invalid_credentials()
            }
            _ => ApiError::from(e),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        IssueTokenResponseData {
            expires_at: token.expires_at,
            token: token.value.into_inner(),
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct IssueTokenRequestBody {
    identifier: String,
    password: String,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct IssueTokenResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
