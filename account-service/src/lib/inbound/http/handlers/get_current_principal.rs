use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use crate::domain::principal::ports::AccountServicePort;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn get_current_customer(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    state
        .customers
        .get_principal(principal.id)
        .await
        .map_err(ApiError::from)
        .map(|ref customer| ApiSuccess::new(StatusCode::OK, customer.into()))
}

pub async fn get_current_manager(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    state
        .managers
        .get_principal(principal.id)
        .await
        .map_err(ApiError::from)
        .map(|ref manager| ApiSuccess::new(StatusCode::OK, manager.into()))
}
