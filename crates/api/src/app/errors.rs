use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use nexcrm_core::DomainError;
use nexcrm_infra::service::AuthError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "operation not permitted")
        }
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid credentials",
        ),
        AuthError::InactiveUser => json_error(
            StatusCode::FORBIDDEN,
            "inactive_user",
            "user account is inactive",
        ),
        AuthError::Token(e) => json_error(StatusCode::UNAUTHORIZED, "invalid_token", e.to_string()),
        AuthError::Password(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "password_error",
            e.to_string(),
        ),
        AuthError::Domain(e) => domain_error_to_response(e),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
