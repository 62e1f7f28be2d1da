use axum::Router;

pub mod activities;
pub mod analytics;
pub mod auth;
pub mod contacts;
pub mod deals;
pub mod organizations;
pub mod system;
pub mod tasks;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/organizations", organizations::router())
        .nest("/contacts", contacts::router())
        .nest("/deals", deals::router())
        .nest("/tasks", tasks::router())
        .nest("/activities", activities::router())
        .nest("/analytics", analytics::router())
}
