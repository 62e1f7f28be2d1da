//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and service construction
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    let services = Arc::new(services::build_services(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState {
        auth: services.auth.clone(),
        memberships: services.memberships.clone(),
    };

    // Authenticated but not tenant-scoped: account-level endpoints.
    let authed = routes::auth::authed_router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state.clone(),
            middleware::auth_middleware,
        ));

    // Tenant-scoped routes: require auth + an active membership in the
    // organization named by the X-Organization-Id header.
    let tenant_scoped = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state.clone(),
            middleware::member_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::auth::public_router().layer(Extension(services)))
        .merge(authed)
        .merge(tenant_scoped)
        .layer(ServiceBuilder::new())
}
