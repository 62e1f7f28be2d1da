use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use nexcrm_infra::service::RegisterRequest;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AuthContext;

/// Routes that require no authentication.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Routes that require a bearer token but no organization context.
pub fn authed_router() -> Router {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/change-password", post(change_password))
        .route("/auth/memberships", get(memberships))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterBody>,
) -> axum::response::Response {
    let request = RegisterRequest {
        email: body.email,
        username: body.username,
        first_name: body.first_name,
        last_name: body.last_name,
        password: body.password,
    };
    match services.auth.register(request) {
        Ok(account) => (
            StatusCode::CREATED,
            Json(dto::registered_to_json(account)),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginBody>,
) -> axum::response::Response {
    match services.auth.login(&body.email, &body.password) {
        Ok(outcome) => {
            (StatusCode::OK, Json(dto::TokenResponse::from(outcome.tokens))).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RefreshBody>,
) -> axum::response::Response {
    match services.auth.refresh(&body.refresh_token) {
        Ok(outcome) => {
            (StatusCode::OK, Json(dto::TokenResponse::from(outcome.tokens))).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
) -> axum::response::Response {
    match services.auth.user(auth.user_id()) {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<dto::ChangePasswordBody>,
) -> axum::response::Response {
    match services
        .auth
        .change_password(auth.user_id(), &body.current_password, &body.new_password)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// All memberships of the calling user, across organizations.
pub async fn memberships(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
) -> axum::response::Response {
    let items = services.memberships.list_for_user(auth.user_id());
    (StatusCode::OK, Json(json!({ "items": items }))).into_response()
}
