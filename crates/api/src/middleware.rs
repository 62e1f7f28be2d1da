use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use nexcrm_core::OrganizationId;
use nexcrm_infra::service::AuthService;
use nexcrm_infra::store::MembershipStore;

use crate::context::{AuthContext, MemberContext, TenantContext};

/// Header selecting the organization a tenant-scoped request acts on.
pub const ORGANIZATION_HEADER: &str = "x-organization-id";

#[derive(Clone)]
pub struct AuthState {
    pub auth: AuthService,
    pub memberships: Arc<MembershipStore>,
}

/// Resolves the bearer token to an active user and stores its identity as a
/// request extension.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let user = state
        .auth
        .authenticate(token)
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(AuthContext::new(user.id));

    Ok(next.run(req).await)
}

/// Resolves the `X-Organization-Id` header to an active membership of the
/// authenticated user and stores tenant + role as request extensions.
///
/// Runs after `auth_middleware`; a request without an active membership in
/// the named organization never reaches a tenant-scoped handler.
pub async fn member_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let organization_id = extract_organization(req.headers())?;

    let member = state
        .memberships
        .resolve(auth.user_id(), organization_id)
        .ok_or(StatusCode::FORBIDDEN)?;

    req.extensions_mut()
        .insert(TenantContext::new(organization_id));
    req.extensions_mut().insert(MemberContext::new(member.role));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

fn extract_organization(headers: &HeaderMap) -> Result<OrganizationId, StatusCode> {
    let header = headers
        .get(ORGANIZATION_HEADER)
        .ok_or(StatusCode::BAD_REQUEST)?;

    let header = header.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;

    header.trim().parse().map_err(|_| StatusCode::BAD_REQUEST)
}
