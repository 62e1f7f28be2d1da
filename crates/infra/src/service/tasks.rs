use chrono::Utc;

use nexcrm_auth::Role;
use nexcrm_core::{DomainError, DomainResult, OrganizationId, Page, TaskId, UserId};
use nexcrm_tasks::{can_mutate, NewTask, Task, TaskStatus, TaskUpdate};

use super::TaskStoreHandle;

/// Task CRUD with the ownership rule applied on every mutation: sales may
/// only touch tasks assigned to them.
#[derive(Clone)]
pub struct TaskService {
    tasks: TaskStoreHandle,
}

impl TaskService {
    pub fn new(tasks: TaskStoreHandle) -> Self {
        Self { tasks }
    }

    pub fn create(
        &self,
        organization_id: OrganizationId,
        actor: UserId,
        new: NewTask,
    ) -> DomainResult<Task> {
        let task = Task::new(organization_id, actor, new)?;
        self.tasks.upsert(organization_id, task.id, task.clone());
        Ok(task)
    }

    pub fn get(&self, organization_id: OrganizationId, id: TaskId) -> DomainResult<Task> {
        self.tasks
            .get(organization_id, &id)
            .ok_or(DomainError::NotFound)
    }

    pub fn list(
        &self,
        organization_id: OrganizationId,
        page: Page,
        search: Option<&str>,
        status: Option<TaskStatus>,
    ) -> Vec<Task> {
        let mut tasks = self.tasks.list(organization_id);
        if let Some(query) = search {
            tasks.retain(|t| t.matches(query));
        }
        if let Some(status) = status {
            tasks.retain(|t| t.status == status);
        }
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page.slice(tasks)
    }

    pub fn update(
        &self,
        organization_id: OrganizationId,
        id: TaskId,
        role: Role,
        actor: UserId,
        update: TaskUpdate,
    ) -> DomainResult<Task> {
        let mut task = self.get(organization_id, id)?;
        if !can_mutate(role, task.assigned_to, actor) {
            return Err(DomainError::Unauthorized);
        }
        task.apply(update)?;
        self.tasks.upsert(organization_id, task.id, task.clone());
        Ok(task)
    }

    pub fn complete(
        &self,
        organization_id: OrganizationId,
        id: TaskId,
        role: Role,
        actor: UserId,
    ) -> DomainResult<Task> {
        let mut task = self.get(organization_id, id)?;
        if !can_mutate(role, task.assigned_to, actor) {
            return Err(DomainError::Unauthorized);
        }
        task.complete();
        self.tasks.upsert(organization_id, task.id, task.clone());
        Ok(task)
    }

    pub fn delete(
        &self,
        organization_id: OrganizationId,
        id: TaskId,
        role: Role,
        actor: UserId,
    ) -> DomainResult<()> {
        let task = self.get(organization_id, id)?;
        if !can_mutate(role, task.assigned_to, actor) {
            return Err(DomainError::Unauthorized);
        }
        self.tasks.remove(organization_id, &id);
        Ok(())
    }

    /// Tasks past their due date and not done, soonest due first.
    pub fn overdue(&self, organization_id: OrganizationId) -> Vec<Task> {
        let now = Utc::now();
        let mut tasks = self.tasks.list(organization_id);
        tasks.retain(|t| t.is_overdue(now));
        tasks.sort_by_key(|t| t.due_date);
        tasks
    }

    pub fn list_for_user(&self, organization_id: OrganizationId, user_id: UserId) -> Vec<Task> {
        let mut tasks = self.tasks.list(organization_id);
        tasks.retain(|t| t.assigned_to == user_id);
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }
}
