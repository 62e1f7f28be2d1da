use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexcrm_auth::Role;
use nexcrm_core::{ContactId, DealId, DomainError, DomainResult, OrganizationId, TaskId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "cancelled" => Ok(TaskStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown task status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub organization_id: OrganizationId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: UserId,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
    pub created_by: UserId,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: UserId,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<UserId>,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
}

/// Sales may only touch tasks assigned to them; every other role may touch
/// any task in the organization.
pub fn can_mutate(role: Role, assigned_to: UserId, actor: UserId) -> bool {
    match role {
        Role::Sales => assigned_to == actor,
        _ => true,
    }
}

/// Due dates may not fall on a past calendar day. Comparison is by date, so
/// "later today" is fine.
fn validate_due_date(due_date: Option<DateTime<Utc>>) -> DomainResult<()> {
    if let Some(due) = due_date {
        if due.date_naive() < Utc::now().date_naive() {
            return Err(DomainError::validation("due date cannot be in the past"));
        }
    }
    Ok(())
}

impl Task {
    pub fn new(organization_id: OrganizationId, created_by: UserId, new: NewTask) -> DomainResult<Self> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("task title cannot be empty"));
        }
        validate_due_date(new.due_date)?;

        let now = Utc::now();
        Ok(Self {
            id: TaskId::new(),
            organization_id,
            title,
            description: new.description,
            status: TaskStatus::Todo,
            priority: new.priority,
            due_date: new.due_date,
            assigned_to: new.assigned_to,
            contact_id: new.contact_id,
            deal_id: new.deal_id,
            created_by,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, update: TaskUpdate) -> DomainResult<()> {
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(DomainError::validation("task title cannot be empty"));
            }
            self.title = title;
        }
        if update.due_date.is_some() {
            validate_due_date(update.due_date)?;
            self.due_date = update.due_date;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(status) = update.status {
            self.set_status(status);
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(assigned_to) = update.assigned_to {
            self.assigned_to = assigned_to;
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

    pub fn complete(&mut self) {
        self.set_status(TaskStatus::Done);
        self.updated_at = Utc::now();
    }

    fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed_at = if status == TaskStatus::Done {
            Some(Utc::now())
        } else {
            None
        };
    }

    /// Past its due date and not done.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < now)
    }

    /// Case-insensitive title search.
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}
