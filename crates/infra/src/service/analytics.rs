use chrono::Utc;
use serde::Serialize;

use nexcrm_activities::{Activity, ActivityType};
use nexcrm_core::OrganizationId;
use nexcrm_deals::DealStatus;
use nexcrm_tasks::TaskStatus;

use super::{ActivityStoreHandle, ContactStoreHandle, DealStoreHandle, TaskStoreHandle};

/// Rates are percentages rounded to two decimal places; 0 when the
/// denominator is zero.
fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 10_000.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct DealsSummary {
    pub total_deals: usize,
    pub new: usize,
    pub in_progress: usize,
    pub won: usize,
    pub lost: usize,
    pub closed: usize,
    /// Sum of in-progress deal amounts, in minor units.
    pub pipeline_amount: i64,
    /// Sum of won deal amounts, in minor units.
    pub won_amount: i64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TasksSummary {
    pub total_tasks: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub cancelled: usize,
    pub overdue: usize,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactStatistics {
    pub total_contacts: usize,
    pub contacts_with_deals: usize,
    pub contacts_with_email: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityStatistics {
    pub total_activities: usize,
    pub calls: usize,
    pub emails: usize,
    pub meetings: usize,
    pub notes: usize,
    pub tasks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub deals: DealsSummary,
    pub tasks: TasksSummary,
    pub contacts: ContactStatistics,
    pub activities: ActivityStatistics,
    pub recent_activities: Vec<Activity>,
}

const DASHBOARD_RECENT_LIMIT: usize = 10;

/// Read-only aggregations over the tenant's records.
#[derive(Clone)]
pub struct AnalyticsService {
    deals: DealStoreHandle,
    tasks: TaskStoreHandle,
    contacts: ContactStoreHandle,
    activities: ActivityStoreHandle,
}

impl AnalyticsService {
    pub fn new(
        deals: DealStoreHandle,
        tasks: TaskStoreHandle,
        contacts: ContactStoreHandle,
        activities: ActivityStoreHandle,
    ) -> Self {
        Self {
            deals,
            tasks,
            contacts,
            activities,
        }
    }

    pub fn deals_summary(&self, organization_id: OrganizationId) -> DealsSummary {
        let deals = self.deals.list(organization_id);
        let count = |s: DealStatus| deals.iter().filter(|d| d.status == s).count();
        let won = count(DealStatus::Won);
        DealsSummary {
            total_deals: deals.len(),
            new: count(DealStatus::New),
            in_progress: count(DealStatus::InProgress),
            won,
            lost: count(DealStatus::Lost),
            closed: count(DealStatus::Closed),
            pipeline_amount: deals
                .iter()
                .filter(|d| d.status == DealStatus::InProgress)
                .filter_map(|d| d.amount)
                .sum(),
            won_amount: deals
                .iter()
                .filter(|d| d.status == DealStatus::Won)
                .filter_map(|d| d.amount)
                .sum(),
            win_rate: rate(won, deals.len()),
        }
    }

    pub fn tasks_summary(&self, organization_id: OrganizationId) -> TasksSummary {
        let tasks = self.tasks.list(organization_id);
        let now = Utc::now();
        let count = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();
        let done = count(TaskStatus::Done);
        TasksSummary {
            total_tasks: tasks.len(),
            todo: count(TaskStatus::Todo),
            in_progress: count(TaskStatus::InProgress),
            done,
            cancelled: count(TaskStatus::Cancelled),
            overdue: tasks.iter().filter(|t| t.is_overdue(now)).count(),
            completion_rate: rate(done, tasks.len()),
        }
    }

    pub fn contact_statistics(&self, organization_id: OrganizationId) -> ContactStatistics {
        let contacts = self.contacts.list(organization_id);
        let deals = self.deals.list(organization_id);
        ContactStatistics {
            total_contacts: contacts.len(),
            contacts_with_deals: contacts
                .iter()
                .filter(|c| deals.iter().any(|d| d.contact_id == c.id))
                .count(),
            contacts_with_email: contacts.iter().filter(|c| c.email.is_some()).count(),
        }
    }

    pub fn activity_statistics(&self, organization_id: OrganizationId) -> ActivityStatistics {
        let activities = self.activities.list(organization_id);
        let count = |t: ActivityType| activities.iter().filter(|a| a.activity_type == t).count();
        ActivityStatistics {
            total_activities: activities.len(),
            calls: count(ActivityType::Call),
            emails: count(ActivityType::Email),
            meetings: count(ActivityType::Meeting),
            notes: count(ActivityType::Note),
            tasks: count(ActivityType::Task),
        }
    }

    pub fn dashboard(&self, organization_id: OrganizationId) -> Dashboard {
        let mut recent = self.activities.list(organization_id);
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(DASHBOARD_RECENT_LIMIT);
        Dashboard {
            deals: self.deals_summary(organization_id),
            tasks: self.tasks_summary(organization_id),
            contacts: self.contact_statistics(organization_id),
            activities: self.activity_statistics(organization_id),
            recent_activities: recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nexcrm_core::UserId;
    use nexcrm_deals::{Deal, NewDeal};
    use nexcrm_core::ContactId;

    use crate::store::InMemoryTenantStore;

    use super::*;

    fn service() -> (AnalyticsService, DealStoreHandle) {
        let deals: DealStoreHandle = Arc::new(InMemoryTenantStore::new());
        (
            AnalyticsService::new(
                deals.clone(),
                Arc::new(InMemoryTenantStore::new()),
                Arc::new(InMemoryTenantStore::new()),
                Arc::new(InMemoryTenantStore::new()),
            ),
            deals,
        )
    }

    fn deal(org: OrganizationId, amount: Option<i64>, to: Option<DealStatus>) -> Deal {
        let mut deal = Deal::new(
            org,
            NewDeal {
                contact_id: ContactId::new(),
                title: "d".into(),
                description: None,
                amount,
                assigned_to: None,
                expected_close_date: None,
            },
        )
        .unwrap();
        if let Some(target) = to {
            if target == DealStatus::Won {
                deal.transition_to(DealStatus::InProgress).unwrap();
            }
            deal.transition_to(target).unwrap();
        }
        deal
    }

    #[test]
    fn empty_tenant_reports_zero_rates() {
        let (service, _) = service();
        let summary = service.deals_summary(OrganizationId::new());
        assert_eq!(summary.total_deals, 0);
        assert_eq!(summary.win_rate, 0.0);
    }

    #[test]
    fn win_rate_is_rounded_to_two_decimals() {
        let (service, deals) = service();
        let org = OrganizationId::new();
        let won = deal(org, Some(300), Some(DealStatus::Won));
        deals.upsert(org, won.id, won);
        for _ in 0..2 {
            let open = deal(org, Some(100), None);
            deals.upsert(org, open.id, open);
        }

        let summary = service.deals_summary(org);
        assert_eq!(summary.total_deals, 3);
        assert_eq!(summary.won, 1);
        // 1/3 of deals won
        assert_eq!(summary.win_rate, 33.33);
        assert_eq!(summary.won_amount, 300);
    }

    #[test]
    fn pipeline_amount_sums_only_in_progress_deals() {
        let (service, deals) = service();
        let org = OrganizationId::new();
        for (amount, status) in [
            (Some(200), Some(DealStatus::InProgress)),
            (Some(50), Some(DealStatus::InProgress)),
            (Some(1_000), Some(DealStatus::Won)),
            (Some(75), None),
        ] {
            let d = deal(org, amount, status);
            deals.upsert(org, d.id, d);
        }

        let summary = service.deals_summary(org);
        assert_eq!(summary.pipeline_amount, 250);
        assert_eq!(summary.won_amount, 1_000);
    }

    #[test]
    fn dashboard_caps_recent_activities_at_ten() {
        let (service, _) = service();
        let org = OrganizationId::new();
        let activities = service.activities.clone();
        for i in 0..15 {
            let a = nexcrm_activities::Activity::new(
                org,
                UserId::new(),
                nexcrm_activities::NewActivity {
                    activity_type: ActivityType::Note,
                    title: format!("n{i}"),
                    description: None,
                    activity_date: None,
                    duration_minutes: None,
                    contact_id: None,
                    deal_id: None,
                },
            )
            .unwrap();
            activities.upsert(org, a.id, a);
        }
        assert_eq!(service.dashboard(org).recent_activities.len(), 10);
    }
}
