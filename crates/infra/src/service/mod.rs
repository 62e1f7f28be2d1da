use std::sync::Arc;

use nexcrm_activities::Activity;
use nexcrm_contacts::Contact;
use nexcrm_core::{ActivityId, ContactId, DealId, TaskId};
use nexcrm_deals::Deal;
use nexcrm_tasks::Task;

use crate::store::TenantStore;

mod activities;
mod analytics;
mod auth;
mod contacts;
mod deals;
mod tasks;

pub use activities::ActivityService;
pub use analytics::{
    ActivityStatistics, AnalyticsService, ContactStatistics, Dashboard, DealsSummary,
    TasksSummary,
};
pub use auth::{AuthError, AuthService, LoginOutcome, RegisterRequest, RegisteredAccount};
pub use contacts::ContactService;
pub use deals::DealService;
pub use tasks::TaskService;

pub type ContactStoreHandle = Arc<dyn TenantStore<ContactId, Contact>>;
pub type DealStoreHandle = Arc<dyn TenantStore<DealId, Deal>>;
pub type TaskStoreHandle = Arc<dyn TenantStore<TaskId, Task>>;
pub type ActivityStoreHandle = Arc<dyn TenantStore<ActivityId, Activity>>;
