use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use crate::domain::errors::IdentifierError;
use crate::domain::principal::models::CreateManagerCommand;
use crate::domain::principal::models::Identifier;
use crate::domain::principal::models::Password;
use crate::domain::principal::models::Role;
use crate::domain::principal::ports::ManagementServicePort;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn create_manager(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedPrincipal>,
    Json(body): Json<CreateManagerRequest>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    state
        .management
        .create_manager(caller.id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref manager| ApiSuccess::new(StatusCode::CREATED, manager.into()))
}

/// HTTP request body for creating a manager (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CreateManagerRequest {
    identifier: String,
    password: String,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateManagerRequestError {
    #[error("Invalid identifier: {0}")]
    Identifier(#[from] IdentifierError),
}

impl CreateManagerRequest {
    fn try_into_command(self) -> Result<CreateManagerCommand, ParseCreateManagerRequestError> {
        let identifier = Identifier::new(self.identifier)?;
        let role = if self
            .roles
            .iter()
            .any(|role| role.eq_ignore_ascii_case("admin"))
        {
            Role::Admin
        } else {
            Role::Manager
        };

        Ok(CreateManagerCommand {
            identifier,
            password: Password::new(self.password),
            role,
        })
    }
}

impl From<ParseCreateManagerRequestError> for ApiError {
    fn from(err: ParseCreateManagerRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
