mod membership_store;
mod organization_store;
mod tenant_store;
mod user_store;

pub use membership_store::MembershipStore;
pub use organization_store::OrganizationStore;
pub use tenant_store::{InMemoryTenantStore, TenantStore};
pub use user_store::UserStore;
