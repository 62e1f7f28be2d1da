use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use nexcrm_auth::Permission;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{MemberContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/me", get(current).patch(update))
        .route("/me/members", get(members))
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganizationUpdateBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// The organization named by the request's tenant context.
pub async fn current(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.organizations.get(tenant.organization_id()) {
        Some(org) => (StatusCode::OK, Json(org)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Json(body): Json<OrganizationUpdateBody>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::ManageOrganization) {
        return resp;
    }
    let Some(mut org) = services.organizations.get(tenant.organization_id()) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found");
    };

    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "organization name cannot be empty",
            );
        }
        org.name = name;
    }
    if let Some(description) = body.description {
        org.description = Some(description);
    }
    if let Some(website) = body.website {
        org.website = Some(website);
    }
    if let Some(phone) = body.phone {
        org.phone = Some(phone);
    }
    if let Some(email) = body.email {
        org.email = Some(email);
    }
    if let Some(address) = body.address {
        org.address = Some(address);
    }
    if let Some(city) = body.city {
        org.city = Some(city);
    }
    if let Some(country) = body.country {
        org.country = Some(country);
    }
    if let Some(postal_code) = body.postal_code {
        org.postal_code = Some(postal_code);
    }
    org.updated_at = Utc::now();

    match services.organizations.update(org.clone()) {
        Ok(()) => (StatusCode::OK, Json(org)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn members(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::ManageMembers) {
        return resp;
    }
    let items = services
        .memberships
        .list_for_organization(tenant.organization_id());
    (StatusCode::OK, Json(json!({ "items": items }))).into_response()
}
