use nexcrm_activities::{Activity, ActivityUpdate, NewActivity};
use nexcrm_core::{ActivityId, ContactId, DealId, DomainError, DomainResult, OrganizationId, Page, UserId};

use super::ActivityStoreHandle;

/// Activity log CRUD and the feed queries.
#[derive(Clone)]
pub struct ActivityService {
    activities: ActivityStoreHandle,
}

impl ActivityService {
    pub fn new(activities: ActivityStoreHandle) -> Self {
        Self { activities }
    }

    pub fn create(
        &self,
        organization_id: OrganizationId,
        actor: UserId,
        new: NewActivity,
    ) -> DomainResult<Activity> {
        let activity = Activity::new(organization_id, actor, new)?;
        self.activities
            .upsert(organization_id, activity.id, activity.clone());
        Ok(activity)
    }

    pub fn get(&self, organization_id: OrganizationId, id: ActivityId) -> DomainResult<Activity> {
        self.activities
            .get(organization_id, &id)
            .ok_or(DomainError::NotFound)
    }

    /// Most recent activity date first.
    pub fn list(&self, organization_id: OrganizationId, page: Page) -> Vec<Activity> {
        let mut activities = self.activities.list(organization_id);
        activities.sort_by(|a, b| b.activity_date.cmp(&a.activity_date));
        page.slice(activities)
    }

    /// The `limit` most recently created entries, used by the dashboard feed.
    pub fn recent(&self, organization_id: OrganizationId, limit: usize) -> Vec<Activity> {
        let mut activities = self.activities.list(organization_id);
        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        activities.truncate(limit);
        activities
    }

    pub fn update(
        &self,
        organization_id: OrganizationId,
        id: ActivityId,
        update: ActivityUpdate,
    ) -> DomainResult<Activity> {
        let mut activity = self.get(organization_id, id)?;
        activity.apply(update)?;
        self.activities
            .upsert(organization_id, activity.id, activity.clone());
        Ok(activity)
    }

    pub fn delete(&self, organization_id: OrganizationId, id: ActivityId) -> DomainResult<()> {
        self.activities
            .remove(organization_id, &id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }

    pub fn list_by_contact(
        &self,
        organization_id: OrganizationId,
        contact_id: ContactId,
    ) -> Vec<Activity> {
        let mut activities = self.activities.list(organization_id);
        activities.retain(|a| a.contact_id == Some(contact_id));
        activities.sort_by(|a, b| b.activity_date.cmp(&a.activity_date));
        activities
    }

    pub fn list_by_deal(&self, organization_id: OrganizationId, deal_id: DealId) -> Vec<Activity> {
        let mut activities = self.activities.list(organization_id);
        activities.retain(|a| a.deal_id == Some(deal_id));
        activities.sort_by(|a, b| b.activity_date.cmp(&a.activity_date));
        activities
    }

    pub fn list_by_user(&self, organization_id: OrganizationId, user_id: UserId) -> Vec<Activity> {
        let mut activities = self.activities.list(organization_id);
        activities.retain(|a| a.created_by == user_id);
        activities.sort_by(|a, b| b.activity_date.cmp(&a.activity_date));
        activities
    }
}
