use nexcrm_auth::Role;
use nexcrm_core::{OrganizationId, UserId};

/// Authenticated identity for a request, derived from the bearer token.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user_id: UserId,
}

impl AuthContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Tenant context for a request.
///
/// This is immutable and must be present for all tenant-scoped routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    organization_id: OrganizationId,
}

impl TenantContext {
    pub fn new(organization_id: OrganizationId) -> Self {
        Self { organization_id }
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }
}

/// The caller's membership in the request's organization.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemberContext {
    role: Role,
}

impl MemberContext {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
