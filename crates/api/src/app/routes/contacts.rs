use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use nexcrm_auth::Permission;
use nexcrm_contacts::{ContactUpdate, NewContact};
use nexcrm_core::ContactId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{MemberContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create).get(list))
        .route("/:id", get(get_one).patch(update).delete(delete_one))
        .route("/:id/activities", get(activities))
}

fn parse_id(id: &str) -> Result<ContactId, axum::response::Response> {
    id.parse().map_err(errors::domain_error_to_response)
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Json(body): Json<NewContact>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Create) {
        return resp;
    }
    match services.contacts.create(tenant.organization_id(), body) {
        Ok(contact) => (StatusCode::CREATED, Json(contact)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Read) {
        return resp;
    }
    let items = services.contacts.list(
        tenant.organization_id(),
        query.page(),
        query.search.as_deref(),
    );
    (StatusCode::OK, Json(json!({ "items": items }))).into_response()
}

pub async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Read) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.contacts.get(tenant.organization_id(), id) {
        Ok(contact) => (StatusCode::OK, Json(contact)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Path(id): Path<String>,
    Json(body): Json<ContactUpdate>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Update) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.contacts.update(tenant.organization_id(), id, body) {
        Ok(contact) => (StatusCode::OK, Json(contact)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_one(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Delete) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.contacts.delete(tenant.organization_id(), id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Activity log entries referencing this contact.
pub async fn activities(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Read) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(e) = services.contacts.get(tenant.organization_id(), id) {
        return errors::domain_error_to_response(e);
    }
    let items = services
        .activities
        .list_by_contact(tenant.organization_id(), id);
    (StatusCode::OK, Json(json!({ "items": items }))).into_response()
}
