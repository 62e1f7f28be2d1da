use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use nexcrm_auth::Permission;
use nexcrm_core::DealId;
use nexcrm_deals::{DealStatus, DealUpdate, NewDeal};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{AuthContext, MemberContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create).get(list))
        .route("/:id", get(get_one).patch(update).delete(delete_one))
        .route("/:id/status", post(change_status))
        .route("/:id/activities", get(activities))
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusBody {
    pub status: String,
}

fn parse_id(id: &str) -> Result<DealId, axum::response::Response> {
    id.parse().map_err(errors::domain_error_to_response)
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Json(body): Json<NewDeal>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Create) {
        return resp;
    }
    match services.deals.create(tenant.organization_id(), body) {
        Ok(deal) => (StatusCode::CREATED, Json(deal)).into_response(),
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
        Some(s) => match s.parse::<DealStatus>() {
            Ok(status) => Some(status),
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => None,
    };
    let items = services.deals.list(
        tenant.organization_id(),
        query.page(),
        query.search.as_deref(),
        status,
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
    match services.deals.get(tenant.organization_id(), id) {
        Ok(deal) => (StatusCode::OK, Json(deal)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Path(id): Path<String>,
    Json(body): Json<DealUpdate>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Update) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.deals.update(tenant.organization_id(), id, body) {
        Ok(deal) => (StatusCode::OK, Json(deal)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// The only write path that moves a deal's status.
pub async fn change_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<ChangeStatusBody>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::Update) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let target = match body.status.parse::<DealStatus>() {
        Ok(status) => status,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services
        .deals
        .change_status(tenant.organization_id(), id, target, auth.user_id())
    {
        Ok(deal) => (StatusCode::OK, Json(deal)).into_response(),
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
    match services.deals.delete(tenant.organization_id(), id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

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
    if let Err(e) = services.deals.get(tenant.organization_id(), id) {
        return errors::domain_error_to_response(e);
    }
    let items = services
        .activities
        .list_by_deal(tenant.organization_id(), id);
    (StatusCode::OK, Json(json!({ "items": items }))).into_response()
}
