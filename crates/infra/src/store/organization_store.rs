use std::collections::HashMap;
use std::sync::RwLock;

use nexcrm_core::{DomainError, DomainResult, OrganizationId};
use nexcrm_tenancy::Organization;

/// Registry of organizations, keyed by id.
#[derive(Debug, Default)]
pub struct OrganizationStore {
    inner: RwLock<HashMap<OrganizationId, Organization>>,
}

impl OrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, organization: Organization) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(organization.id, organization);
        }
    }

    pub fn get(&self, id: OrganizationId) -> Option<Organization> {
        self.inner.read().ok()?.get(&id).cloned()
    }

    pub fn update(&self, organization: Organization) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("organization store lock poisoned"))?;
        if !map.contains_key(&organization.id) {
            return Err(DomainError::not_found());
        }
        map.insert(organization.id, organization);
        Ok(())
    }
}
