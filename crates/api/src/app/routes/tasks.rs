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
use nexcrm_core::TaskId;
use nexcrm_tasks::{NewTask, TaskStatus, TaskUpdate};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{AuthContext, MemberContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create).get(list))
        .route("/overdue", get(overdue))
        .route("/mine", get(mine))
        .route("/:id", get(get_one).patch(update).delete(delete_one))
        .route("/:id/complete", post(complete))
}

fn parse_id(id: &str) -> Result<TaskId, axum::response::Response> {
    id.parse().map_err(errors::domain_error_to_response)
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<NewTask>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Create) {
        return resp;
    }
    match services
        .tasks
        .create(tenant.organization_id(), auth.user_id(), body)
    {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
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
    let status = match query.status.as_deref() {
        Some(s) => match s.parse::<TaskStatus>() {
            Ok(status) => Some(status),
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => None,
    };
    let items = services.tasks.list(
        tenant.organization_id(),
        query.page(),
        query.search.as_deref(),
        status,
    );
    (StatusCode::OK, Json(json!({ "items": items }))).into_response()
}

pub async fn overdue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Read) {
        return resp;
    }
    let items = services.tasks.overdue(tenant.organization_id());
    (StatusCode::OK, Json(json!({ "items": items }))).into_response()
}

/// Tasks assigned to the calling user.
pub async fn mine(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Extension(auth): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Read) {
        return resp;
    }
    let items = services
        .tasks
        .list_for_user(tenant.organization_id(), auth.user_id());
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
    match services.tasks.get(tenant.organization_id(), id) {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<TaskUpdate>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Update) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.tasks.update(
        tenant.organization_id(),
        id,
        member.role(),
        auth.user_id(),
        body,
    ) {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn complete(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Update) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services
        .tasks
        .complete(tenant.organization_id(), id, member.role(), auth.user_id())
    {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_one(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    // Task removal follows the same ownership rule as the other task
    // mutations; the role gate is Update, not Delete.
    if let Err(resp) = authz::require(&member, Permission::Update) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services
        .tasks
        .delete(tenant.organization_id(), id, member.role(), auth.user_id())
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
