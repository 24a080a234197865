use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use crate::domain::principal::ports::ManagementServicePort;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn list_customers(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedPrincipal>,
    Query(params): Query<ListCustomersParams>,
) -> Result<ApiSuccess<Vec<PrincipalData>>, ApiError> {
    state
        .management
        .list_customers(caller.id, params.active_only)
        .await
        .map_err(ApiError::from)
        .map(|customers| {
            ApiSuccess::new(
                StatusCode::OK,
                customers.iter().map(PrincipalData::from).collect(),
            )
        })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCustomersParams {
    #[serde(default)]
    active_only: bool,
}
