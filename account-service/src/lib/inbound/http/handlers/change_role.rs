use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::parse_principal_id;
use super::ApiError;
use super::ApiSuccess;
use super::PrincipalData;
use crate::domain::principal::models::Role;
use crate::domain::principal::ports::ManagementServicePort;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn change_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedPrincipal>,
    Path(manager_id): Path<String>,
    Json(body): Json<ChangeRoleRequest>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let manager_id = parse_principal_id(&manager_id)?;
    let role = body.role.parse::<Role>().map_err(ApiError::from)?;

    state
        .management
        .change_role(caller.id, manager_id, role)
        .await
        .map_err(ApiError::from)
        .map(|ref manager| ApiSuccess::new(StatusCode::OK, manager.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeRoleRequest {
    role: String,
}
