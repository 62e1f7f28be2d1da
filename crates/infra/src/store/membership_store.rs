use std::collections::HashMap;
use std::sync::RwLock;

use nexcrm_core::{DomainError, DomainResult, MembershipId, OrganizationId, UserId};
use nexcrm_tenancy::OrganizationMember;

/// Memberships linking users to organizations. Enforces the one-active-
/// membership-per-(user, organization) rule at the write path.
#[derive(Debug, Default)]
pub struct MembershipStore {
    inner: RwLock<HashMap<MembershipId, OrganizationMember>>,
}

impl MembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, member: OrganizationMember) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("membership store lock poisoned"))?;
        let duplicate = map.values().any(|m| {
            m.is_active
                && m.user_id == member.user_id
                && m.organization_id == member.organization_id
        });
        if member.is_active && duplicate {
            return Err(DomainError::conflict(
                "user already has an active membership in this organization",
            ));
        }
        map.insert(member.id, member);
        Ok(())
    }

    /// The active membership of a user in an organization, if any. Inactive
    /// memberships never resolve.
    pub fn resolve(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> Option<OrganizationMember> {
        self.inner
            .read()
            .ok()?
            .values()
            .find(|m| {
                m.is_active && m.user_id == user_id && m.organization_id == organization_id
            })
            .cloned()
    }

    pub fn list_for_organization(&self, organization_id: OrganizationId) -> Vec<OrganizationMember> {
        match self.inner.read() {
            Ok(map) => map
                .values()
                .filter(|m| m.organization_id == organization_id)
                .cloned()
                .collect(),
            Err(_) => vec![],
        }
    }

    pub fn list_for_user(&self, user_id: UserId) -> Vec<OrganizationMember> {
        match self.inner.read() {
            Ok(map) => map
                .values()
                .filter(|m| m.user_id == user_id)
                .cloned()
                .collect(),
            Err(_) => vec![],
        }
    }
}
