use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use crate::domain::errors::IdentifierError;
use crate::domain::principal::models::Identifier;
use crate::domain::principal::models::Password;
use crate::domain::principal::models::RegisterCommand;
use crate::domain::principal::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn register_customer(
    State(state): State<AppState>,
    Json(body): Json<RegisterCustomerRequest>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    state
        .customers
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref customer| ApiSuccess::new(StatusCode::CREATED, customer.into()))
}

/// HTTP request body for registering a customer (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterCustomerRequest {
    identifier: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterCustomerRequestError {
    #[error("Invalid identifier: {0}")]
    Identifier(#[from] IdentifierError),
}

impl RegisterCustomerRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterCustomerRequestError> {
        let identifier = Identifier::new(self.identifier)?;
        let password = Password::new(self.password);
        Ok(RegisterCommand::new(identifier, password))
    }
}

impl From<ParseRegisterCustomerRequestError> for ApiError {
    fn from(err: ParseRegisterCustomerRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
