use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use nexcrm_activities::{ActivityUpdate, NewActivity};
use nexcrm_auth::Permission;
use nexcrm_core::ActivityId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{AuthContext, MemberContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create).get(list))
        .route("/recent", get(recent))
        .route("/:id", get(get_one).patch(update).delete(delete_one))
}

const RECENT_DEFAULT_LIMIT: usize = 10;

fn parse_id(id: &str) -> Result<ActivityId, axum::response::Response> {
    id.parse().map_err(errors::domain_error_to_response)
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<NewActivity>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Create) {
        return resp;
    }
    match services
        .activities
        .create(tenant.organization_id(), auth.user_id(), body)
    {
        Ok(activity) => (StatusCode::CREATED, Json(activity)).into_response(),
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
    let items = services
        .activities
        .list(tenant.organization_id(), query.page());
    (StatusCode::OK, Json(json!({ "items": items }))).into_response()
}

pub async fn recent(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Read) {
        return resp;
    }
    let limit = query.limit.unwrap_or(RECENT_DEFAULT_LIMIT);
    let items = services.activities.recent(tenant.organization_id(), limit);
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
    match services.activities.get(tenant.organization_id(), id) {
        Ok(activity) => (StatusCode::OK, Json(activity)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Path(id): Path<String>,
    Json(body): Json<ActivityUpdate>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Update) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.activities.update(tenant.organization_id(), id, body) {
        Ok(activity) => (StatusCode::OK, Json(activity)).into_response(),
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
    match services.activities.delete(tenant.organization_id(), id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
