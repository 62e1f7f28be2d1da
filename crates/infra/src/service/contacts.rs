use nexcrm_contacts::{Contact, ContactUpdate, NewContact};
use nexcrm_core::{ContactId, DomainError, DomainResult, OrganizationId, Page};

use super::{ContactStoreHandle, DealStoreHandle};

/// Contact CRUD. Deletion is refused while deals still reference the
/// contact.
#[derive(Clone)]
pub struct ContactService {
    contacts: ContactStoreHandle,
    deals: DealStoreHandle,
}

impl ContactService {
    pub fn new(contacts: ContactStoreHandle, deals: DealStoreHandle) -> Self {
        Self { contacts, deals }
    }

    pub fn create(&self, organization_id: OrganizationId, new: NewContact) -> DomainResult<Contact> {
        let contact = Contact::new(organization_id, new)?;
        self.contacts
            .upsert(organization_id, contact.id, contact.clone());
        Ok(contact)
    }

    pub fn get(&self, organization_id: OrganizationId, id: ContactId) -> DomainResult<Contact> {
        self.contacts
            .get(organization_id, &id)
            .ok_or(DomainError::NotFound)
    }

    /// Newest first, with optional substring search over name, email and
    /// company.
    pub fn list(
        &self,
        organization_id: OrganizationId,
        page: Page,
        search: Option<&str>,
    ) -> Vec<Contact> {
        let mut contacts = self.contacts.list(organization_id);
        if let Some(query) = search {
            contacts.retain(|c| c.matches(query));
        }
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page.slice(contacts)
    }

    pub fn update(
        &self,
        organization_id: OrganizationId,
        id: ContactId,
        update: ContactUpdate,
    ) -> DomainResult<Contact> {
        let mut contact = self.get(organization_id, id)?;
        contact.apply(update)?;
        self.contacts
            .upsert(organization_id, contact.id, contact.clone());
        Ok(contact)
    }

    pub fn delete(&self, organization_id: OrganizationId, id: ContactId) -> DomainResult<()> {
        if self.contacts.get(organization_id, &id).is_none() {
            return Err(DomainError::NotFound);
        }
        let referenced = self
            .deals
            .list(organization_id)
            .iter()
            .any(|d| d.contact_id == id);
        if referenced {
            return Err(DomainError::validation(
                "contact has deals and cannot be deleted",
            ));
        }
        self.contacts.remove(organization_id, &id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nexcrm_deals::{Deal, NewDeal};

    use crate::store::InMemoryTenantStore;

    use super::*;

    fn service() -> (ContactService, DealStoreHandle) {
        let deals: DealStoreHandle = Arc::new(InMemoryTenantStore::new());
        (
            ContactService::new(Arc::new(InMemoryTenantStore::new()), deals.clone()),
            deals,
        )
    }

    fn new_contact(first: &str) -> NewContact {
        NewContact {
            first_name: first.into(),
            last_name: "Doe".into(),
            email: None,
            phone: None,
            position: None,
            company: None,
            address: None,
            city: None,
            country: None,
            postal_code: None,
            notes: None,
        }
    }

    #[test]
    fn get_is_tenant_scoped() {
        let (service, _) = service();
        let org_a = OrganizationId::new();
        let org_b = OrganizationId::new();
        let contact = service.create(org_a, new_contact("Jane")).unwrap();
        assert!(service.get(org_a, contact.id).is_ok());
        assert_eq!(service.get(org_b, contact.id), Err(DomainError::NotFound));
    }

    #[test]
    fn delete_is_blocked_while_deals_reference_the_contact() {
        let (service, deals) = service();
        let org = OrganizationId::new();
        let contact = service.create(org, new_contact("Jane")).unwrap();

        let deal = Deal::new(
            org,
            NewDeal {
                contact_id: contact.id,
                title: "Renewal".into(),
                description: None,
                amount: Some(100),
                assigned_to: None,
                expected_close_date: None,
            },
        )
        .unwrap();
        deals.upsert(org, deal.id, deal.clone());

        let err = service.delete(org, contact.id).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        deals.remove(org, &deal.id);
        service.delete(org, contact.id).unwrap();
        assert_eq!(service.get(org, contact.id), Err(DomainError::NotFound));
    }

    #[test]
    fn list_searches_and_paginates() {
        let (service, _) = service();
        let org = OrganizationId::new();
        service.create(org, new_contact("Alice")).unwrap();
        service.create(org, new_contact("Alina")).unwrap();
        service.create(org, new_contact("Bob")).unwrap();

        let hits = service.list(org, Page::default(), Some("ali"));
        assert_eq!(hits.len(), 2);

        let first_page = service.list(org, Page::new(0, 2), None);
        assert_eq!(first_page.len(), 2);
    }
}
