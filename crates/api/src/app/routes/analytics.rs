use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use nexcrm_auth::Permission;

use crate::app::services::AppServices;
use crate::authz;
use crate::context::{MemberContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/deals/summary", get(deals_summary))
        .route("/tasks/summary", get(tasks_summary))
        .route("/contacts/statistics", get(contact_statistics))
        .route("/activities/statistics", get(activity_statistics))
}

pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::ViewReports) {
        return resp;
    }
    let report = services.analytics.dashboard(tenant.organization_id());
    (StatusCode::OK, Json(report)).into_response()
}

pub async fn deals_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::ViewReports) {
        return resp;
    }
    let summary = services.analytics.deals_summary(tenant.organization_id());
    (StatusCode::OK, Json(summary)).into_response()
}

pub async fn tasks_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::ViewReports) {
        return resp;
    }
    let summary = services.analytics.tasks_summary(tenant.organization_id());
    (StatusCode::OK, Json(summary)).into_response()
}

pub async fn contact_statistics(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::ViewReports) {
        return resp;
    }
    let stats = services
        .analytics
        .contact_statistics(tenant.organization_id());
    (StatusCode::OK, Json(stats)).into_response()
}

pub async fn activity_statistics(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(member): Extension<MemberContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&member, Permission::ViewReports) {
        return resp;
    }
    let stats = services
        .analytics
        .activity_statistics(tenant.organization_id());
    (StatusCode::OK, Json(stats)).into_response()
}
