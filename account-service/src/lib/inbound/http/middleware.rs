use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated principal in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub id: PrincipalId,
}

/// Middleware that resolves a customer bearer token
pub async fn authenticate_customer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authenticate_with(&state.customers, req, next).await
}

/// Middleware that resolves a manager bearer token
pub async fn authenticate_manager(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authenticate_with(&state.managers, req, next).await
}

async fn authenticate_with(
    service: &Arc<dyn AccountServicePort>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Owned copy: the request body is not Sync and cannot be borrowed across the await.
    let token = extract_token_from_header(&req)?.to_string();

    let id = service.authenticate(&token).await.map_err(ApiError::from)?;

    req.extensions_mut().insert(AuthenticatedPrincipal { id });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    })
}
