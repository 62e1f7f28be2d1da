use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexcrm_core::{ContactId, DealId, DomainError, DomainResult, OrganizationId, UserId};

use crate::DealStatus;

/// A sales opportunity tied to a contact. Amounts are integer minor units
/// (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub organization_id: OrganizationId,
    pub contact_id: ContactId,
    pub assigned_to: Option<UserId>,
    pub title: String,
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub status: DealStatus,
    pub expected_close_date: Option<DateTime<Utc>>,
    pub closed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDeal {
    pub contact_id: ContactId,
    pub title: String,
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub assigned_to: Option<UserId>,
    pub expected_close_date: Option<DateTime<Utc>>,
}

/// Partial update. Status is deliberately absent: status only moves through
/// the transition endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub assigned_to: Option<UserId>,
    pub expected_close_date: Option<DateTime<Utc>>,
}

fn validate_amount(amount: Option<i64>) -> DomainResult<()> {
    if let Some(amount) = amount {
        if amount <= 0 {
            return Err(DomainError::validation("deal amount must be positive"));
        }
    }
    Ok(())
}

impl Deal {
    pub fn new(organization_id: OrganizationId, new: NewDeal) -> DomainResult<Self> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("deal title cannot be empty"));
        }
        validate_amount(new.amount)?;

        let now = Utc::now();
        Ok(Self {
            id: DealId::new(),
            organization_id,
            contact_id: new.contact_id,
            assigned_to: new.assigned_to,
            title,
            description: new.description,
            amount: new.amount,
            status: DealStatus::New,
            expected_close_date: new.expected_close_date,
            closed_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, update: DealUpdate) -> DomainResult<()> {
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::validation("deal title cannot be empty"));
            }
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if update.amount.is_some() {
            validate_amount(update.amount)?;
            self.amount = update.amount;
        }
        if update.assigned_to.is_some() {
            self.assigned_to = update.assigned_to;
        }
        if update.expected_close_date.is_some() {
            self.expected_close_date = update.expected_close_date;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves the deal to `target`, enforcing the transition table and the
    /// won-deal amount rule. Winning or losing stamps `closed_date`.
    pub fn transition_to(&mut self, target: DealStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invariant(format!(
                "cannot transition deal from {} to {}",
                self.status, target
            )));
        }
        if target == DealStatus::Won && !matches!(self.amount, Some(a) if a > 0) {
            return Err(DomainError::validation(
                "a deal must have a positive amount to be won",
            ));
        }

        self.status = target;
        let now = Utc::now();
        if matches!(target, DealStatus::Won | DealStatus::Lost) {
            self.closed_date = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Case-insensitive title search.
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}
