use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexcrm_core::{ActivityId, ContactId, DealId, DomainError, DomainResult, OrganizationId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    Note,
    Task,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Call => "call",
            ActivityType::Email => "email",
            ActivityType::Meeting => "meeting",
            ActivityType::Note => "note",
            ActivityType::Task => "task",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub organization_id: OrganizationId,
    pub activity_type: ActivityType,
    pub title: String,
    pub description: Option<String>,
    pub activity_date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to now when omitted.
    pub activity_date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityUpdate {
    pub activity_type: Option<ActivityType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub activity_date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
}

impl Activity {
    pub fn new(
        organization_id: OrganizationId,
        created_by: UserId,
        new: NewActivity,
    ) -> DomainResult<Self> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("activity title cannot be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: ActivityId::new(),
            organization_id,
            activity_type: new.activity_type,
            title,
            description: new.description,
            activity_date: new.activity_date.unwrap_or(now),
            duration_minutes: new.duration_minutes,
            contact_id: new.contact_id,
            deal_id: new.deal_id,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, update: ActivityUpdate) -> DomainResult<()> {
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::validation("activity title cannot be empty"));
            }
            self.title = title;
        }
        if let Some(activity_type) = update.activity_type {
            self.activity_type = activity_type;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(activity_date) = update.activity_date {
            self.activity_date = activity_date;
        }
        if update.duration_minutes.is_some() {
            self.duration_minutes = update.duration_minutes;
        }
        if update.contact_id.is_some() {
            self.contact_id = update.contact_id;
        }
        if update.deal_id.is_some() {
            self.deal_id = update.deal_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
