use tracing::info;

use nexcrm_activities::{Activity, ActivityType, NewActivity};
use nexcrm_core::{DealId, DomainError, DomainResult, OrganizationId, Page, UserId};
use nexcrm_deals::{Deal, DealStatus, DealUpdate, NewDeal};

use super::{ActivityStoreHandle, ContactStoreHandle, DealStoreHandle};

/// Deal CRUD and the status transition path. Status never moves through
/// `update`; `change_status` is the only write that touches it.
#[derive(Clone)]
pub struct DealService {
    deals: DealStoreHandle,
    contacts: ContactStoreHandle,
    activities: ActivityStoreHandle,
}

impl DealService {
    pub fn new(
        deals: DealStoreHandle,
        contacts: ContactStoreHandle,
        activities: ActivityStoreHandle,
    ) -> Self {
        Self {
            deals,
            contacts,
            activities,
        }
    }

    pub fn create(&self, organization_id: OrganizationId, new: NewDeal) -> DomainResult<Deal> {
        if self.contacts.get(organization_id, &new.contact_id).is_none() {
            return Err(DomainError::validation(
                "contact not found in this organization",
            ));
        }
        let deal = Deal::new(organization_id, new)?;
        self.deals.upsert(organization_id, deal.id, deal.clone());
        Ok(deal)
    }

    pub fn get(&self, organization_id: OrganizationId, id: DealId) -> DomainResult<Deal> {
        self.deals
            .get(organization_id, &id)
            .ok_or(DomainError::NotFound)
    }

    pub fn list(
        &self,
        organization_id: OrganizationId,
        page: Page,
        search: Option<&str>,
        status: Option<DealStatus>,
    ) -> Vec<Deal> {
        let mut deals = self.deals.list(organization_id);
        if let Some(query) = search {
            deals.retain(|d| d.matches(query));
        }
        if let Some(status) = status {
            deals.retain(|d| d.status == status);
        }
        deals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page.slice(deals)
    }

    pub fn update(
        &self,
        organization_id: OrganizationId,
        id: DealId,
        update: DealUpdate,
    ) -> DomainResult<Deal> {
        let mut deal = self.get(organization_id, id)?;
        deal.apply(update)?;
        self.deals.upsert(organization_id, deal.id, deal.clone());
        Ok(deal)
    }

    /// Applies a status transition and records an audit note in the activity
    /// log. Both writes happen in this one call; a rejected transition
    /// writes nothing.
    pub fn change_status(
        &self,
        organization_id: OrganizationId,
        id: DealId,
        target: DealStatus,
        actor: UserId,
    ) -> DomainResult<Deal> {
        let mut deal = self.get(organization_id, id)?;
        let previous = deal.status;
        deal.transition_to(target)?;
        self.deals.upsert(organization_id, deal.id, deal.clone());

        let note = Activity::new(
            organization_id,
            actor,
            NewActivity {
                activity_type: ActivityType::Note,
                title: format!("Deal status changed to {target}"),
                description: Some(format!("Status changed from {previous} to {target}")),
                activity_date: None,
                duration_minutes: None,
                contact_id: Some(deal.contact_id),
                deal_id: Some(deal.id),
            },
        )?;
        self.activities
            .upsert(organization_id, note.id, note);

        info!(deal_id = %deal.id, %previous, %target, "deal status changed");
        Ok(deal)
    }

    pub fn delete(&self, organization_id: OrganizationId, id: DealId) -> DomainResult<()> {
        self.deals
            .remove(organization_id, &id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nexcrm_contacts::{Contact, NewContact};
    use nexcrm_core::ContactId;

    use crate::store::InMemoryTenantStore;

    use super::*;

    struct Fixture {
        service: DealService,
        activities: ActivityStoreHandle,
        org: OrganizationId,
        contact_id: ContactId,
    }

    fn fixture() -> Fixture {
        let contacts: ContactStoreHandle = Arc::new(InMemoryTenantStore::new());
        let activities: ActivityStoreHandle = Arc::new(InMemoryTenantStore::new());
        let org = OrganizationId::new();
        let contact = Contact::new(
            org,
            NewContact {
                first_name: "Jane".into(),
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
            },
        )
        .unwrap();
        contacts.upsert(org, contact.id, contact.clone());
        Fixture {
            service: DealService::new(
                Arc::new(InMemoryTenantStore::new()),
                contacts,
                activities.clone(),
            ),
            activities,
            org,
            contact_id: contact.id,
        }
    }

    fn new_deal(contact_id: ContactId, amount: Option<i64>) -> NewDeal {
        NewDeal {
            contact_id,
            title: "Renewal".into(),
            description: None,
            amount,
            assigned_to: None,
            expected_close_date: None,
        }
    }

    #[test]
    fn create_requires_a_known_contact() {
        let f = fixture();
        let err = f
            .service
            .create(f.org, new_deal(ContactId::new(), None))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn change_status_writes_an_audit_note() {
        let f = fixture();
        let deal = f
            .service
            .create(f.org, new_deal(f.contact_id, Some(5_000)))
            .unwrap();
        f.service
            .change_status(f.org, deal.id, DealStatus::InProgress, UserId::new())
            .unwrap();

        let notes = f.activities.list(f.org);
        assert_eq!(notes.len(), 1);
        let note = &notes[0];
        assert_eq!(note.activity_type, ActivityType::Note);
        assert_eq!(note.title, "Deal status changed to in_progress");
        assert_eq!(
            note.description.as_deref(),
            Some("Status changed from new to in_progress")
        );
        assert_eq!(note.deal_id, Some(deal.id));
        assert_eq!(note.contact_id, Some(f.contact_id));
    }

    #[test]
    fn rejected_transition_writes_nothing() {
        let f = fixture();
        let deal = f
            .service
            .create(f.org, new_deal(f.contact_id, None))
            .unwrap();
        let err = f
            .service
            .change_status(f.org, deal.id, DealStatus::Won, UserId::new())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert!(f.activities.list(f.org).is_empty());
        assert_eq!(
            f.service.get(f.org, deal.id).unwrap().status,
            DealStatus::New
        );
    }

    #[test]
    fn change_status_is_tenant_scoped() {
        let f = fixture();
        let deal = f
            .service
            .create(f.org, new_deal(f.contact_id, Some(100)))
            .unwrap();
        let other_org = OrganizationId::new();
        let err = f
            .service
            .change_status(other_org, deal.id, DealStatus::InProgress, UserId::new())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn list_filters_by_status() {
        let f = fixture();
        let open = f
            .service
            .create(f.org, new_deal(f.contact_id, Some(100)))
            .unwrap();
        let lost = f
            .service
            .create(f.org, new_deal(f.contact_id, None))
            .unwrap();
        f.service
            .change_status(f.org, lost.id, DealStatus::Lost, UserId::new())
            .unwrap();

        let only_new = f
            .service
            .list(f.org, Page::default(), None, Some(DealStatus::New));
        assert_eq!(only_new.len(), 1);
        assert_eq!(only_new[0].id, open.id);
    }
}
