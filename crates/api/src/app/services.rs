//! Store and service construction for the HTTP app.

use std::sync::Arc;

use nexcrm_auth::TokenService;
use nexcrm_infra::service::{
    ActivityService, ActivityStoreHandle, AnalyticsService, AuthService, ContactService,
    ContactStoreHandle, DealService, DealStoreHandle, TaskService, TaskStoreHandle,
};
use nexcrm_infra::store::{
    InMemoryTenantStore, MembershipStore, OrganizationStore, UserStore,
};

/// All services the handlers use, shared via an `Extension`.
pub struct AppServices {
    pub auth: AuthService,
    pub contacts: ContactService,
    pub deals: DealService,
    pub tasks: TaskService,
    pub activities: ActivityService,
    pub analytics: AnalyticsService,
    pub organizations: Arc<OrganizationStore>,
    pub memberships: Arc<MembershipStore>,
}

pub fn build_services(jwt_secret: Vec<u8>) -> AppServices {
    let users = Arc::new(UserStore::new());
    let organizations = Arc::new(OrganizationStore::new());
    let memberships = Arc::new(MembershipStore::new());

    let contacts: ContactStoreHandle = Arc::new(InMemoryTenantStore::new());
    let deals: DealStoreHandle = Arc::new(InMemoryTenantStore::new());
    let tasks: TaskStoreHandle = Arc::new(InMemoryTenantStore::new());
    let activities: ActivityStoreHandle = Arc::new(InMemoryTenantStore::new());

    let tokens = TokenService::new(&jwt_secret);

    AppServices {
        auth: AuthService::new(
            users,
            organizations.clone(),
            memberships.clone(),
            tokens,
        ),
        contacts: ContactService::new(contacts.clone(), deals.clone()),
        deals: DealService::new(deals.clone(), contacts.clone(), activities.clone()),
        tasks: TaskService::new(tasks.clone()),
        activities: ActivityService::new(activities.clone()),
        analytics: AnalyticsService::new(deals, tasks, contacts, activities),
        organizations,
        memberships,
    }
}
