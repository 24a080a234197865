use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_role::change_role;
use super::handlers::create_manager::create_manager;
use super::handlers::get_current_principal::get_current_customer;
use super::handlers::get_current_principal::get_current_manager;
use super::handlers::issue_token::issue_customer_token;
use super::handlers::issue_token::issue_manager_token;
use super::handlers::list_customers::list_customers;
use super::handlers::register_customer::register_customer;
use super::handlers::remove_customer::remove_customer;
use super::handlers::set_customer_status::block_customer;
use super::handlers::set_customer_status::unblock_customer;
use super::middleware::authenticate_customer;
use super::middleware::authenticate_manager;
use crate::domain::principal::ports::AccountServicePort;
use crate::domain::principal::ports::ManagementServicePort;

#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn AccountServicePort>,
    pub managers: Arc<dyn AccountServicePort>,
    pub management: Arc<dyn ManagementServicePort>,
}

pub fn create_router(
    customers: Arc<dyn AccountServicePort>,
    managers: Arc<dyn AccountServicePort>,
    management: Arc<dyn ManagementServicePort>,
) -> Router {
    let state = AppState {
        customers,
        managers,
        management,
    };

    let public_routes = Router::new()
        .route("/api/customers", post(register_customer))
        .route("/api/customers/token", post(issue_customer_token))
        .route("/api/managers/token", post(issue_manager_token));

    let customer_routes = Router::new()
        .route("/api/customers/me", get(get_current_customer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_customer,
        ));

    let manager_routes = Router::new()
        .route("/api/managers", post(create_manager))
        .route("/api/managers/me", get(get_current_manager))
        .route("/api/managers/:manager_id/role", put(change_role))
        .route("/api/managers/customers", get(list_customers))
        .route(
            "/api/managers/customers/:customer_id",
            delete(remove_customer),
        )
        .route(
            "/api/managers/customers/:customer_id/block",
            post(block_customer),
        )
        .route(
            "/api/managers/customers/:customer_id/unblock",
            post(unblock_customer),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_manager,
        ));

    // Headers carry bearer tokens and are never recorded.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(customer_routes)
        .merge(manager_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
