use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_principal_id;
use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use crate::domain::principal::ports::ManagementServicePort;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn remove_customer(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedPrincipal>,
    Path(customer_id): Path<String>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let customer_id = parse_principal_id(&customer_id)?;

    state
        .management
        .remove_customer(caller.id, customer_id)
        .await
        .map_err(ApiError::from)
        .map(|ref customer| ApiSuccess::new(StatusCode::OK, customer.into()))
}
