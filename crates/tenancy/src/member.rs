use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexcrm_auth::Role;
use nexcrm_core::{MembershipId, OrganizationId, UserId};

/// Links a user to an organization with a role. A user holds at most one
/// active membership per organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub id: MembershipId,
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrganizationMember {
    pub fn new(user_id: UserId, organization_id: OrganizationId, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: MembershipId::new(),
            user_id,
            organization_id,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
