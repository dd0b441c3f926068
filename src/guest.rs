//! This module provides the in-memory task store behind guest sessions
//!
//! A guest store is seeded with a fixed demo set when it is created, lives only as long
//! as its session, and is never persisted. Its operations resolve immediately, but they
//! are exposed through the same asynchronous [`TaskSource`] contract as the remote client
//! so callers need no branching.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::Error;
use crate::mock_behaviour::MockBehaviour;
use crate::task::{Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use crate::traits::TaskSource;

/// The demo set every guest session starts from:
/// six tasks, two per board column.
pub fn demo_tasks() -> Vec<Task> {
    let now = Utc::now();
    vec![
        Task::new_with_parameters(
            TaskId::from("mock-1"),
            "Welcome to Kando!".to_string(),
            Some("Try moving this task to another column or editing it. \
                  All changes are local and won't be saved.".to_string()),
            Priority::High, TaskStatus::Pending,
            now + Duration::days(1), now, now,
        ),
        Task::new_with_parameters(
            TaskId::from("mock-2"),
            "Explore the Kanban board".to_string(),
            Some("This is a demo task. Move it between columns to see how \
                  task management works.".to_string()),
            Priority::Medium, TaskStatus::Pending,
            now + Duration::days(2), now, now,
        ),
        Task::new_with_parameters(
            TaskId::from("mock-3"),
            "Create your first task".to_string(),
            Some("Create a new task. Try setting different priorities and deadlines.".to_string()),
            Priority::Medium, TaskStatus::InProgress,
            now + Duration::days(3), now, now,
        ),
        Task::new_with_parameters(
            TaskId::from("mock-4"),
            "Test drag and drop".to_string(),
            Some("Move tasks between To Do, In Progress, and Done to organize \
                  your workflow.".to_string()),
            Priority::Low, TaskStatus::InProgress,
            now + Duration::days(4), now, now,
        ),
        Task::new_with_parameters(
            TaskId::from("mock-5"),
            "Sample completed task".to_string(),
            Some("This is what a completed task looks like.".to_string()),
            Priority::High, TaskStatus::Done,
            now - Duration::days(1), now - Duration::days(2), now,
        ),
        Task::new_with_parameters(
            TaskId::from("mock-6"),
            "Try editing tasks".to_string(),
            Some("Edit any task to modify its details, priority, or deadline.".to_string()),
            Priority::Low, TaskStatus::Done,
            now - Duration::days(1), now - Duration::days(3), now,
        ),
    ]
}

/// A task source that keeps everything in memory, for guest sessions.
///
/// Tasks keep their insertion order. The store is dropped with its session;
/// a fresh guest session always starts from the pristine demo set again.
pub struct GuestStore {
    tasks: Mutex<Vec<Task>>,
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl GuestStore {
    /// Create a store seeded with [`demo_tasks`]
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(demo_tasks()),
            mock_behaviour: None,
        }
    }

    /// Create a seeded store whose operations can be made to fail, for tests
    pub fn with_mock_behaviour(mock_behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        Self {
            tasks: Mutex::new(demo_tasks()),
            mock_behaviour: Some(mock_behaviour),
        }
    }

    /// Discard every task. Used when a guest session ends.
    pub fn clear(&self) {
        self.tasks.lock().unwrap().clear();
    }
}

impl Default for GuestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskSource for GuestStore {
    /// Returns the full store contents.
    ///
    /// The month/year filters are accepted but deliberately ignored: the reference
    /// implementation never filtered guest data, and this crate preserves that
    /// asymmetry with the remote source rather than silently "fixing" it.
    async fn list_tasks(&self, month: Option<u32>, year: Option<i32>) -> Result<Vec<Task>, Error> {
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_list_tasks()?;
        }

        if month.is_some() || year.is_some() {
            log::debug!("Guest store ignores the month/year filters");
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn create_task(&self, draft: TaskDraft) -> Result<Task, Error> {
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_create_task()?;
        }

        let now = Utc::now();
        let task = Task::new_with_parameters(
            TaskId::random_guest(),
            draft.title_ref().to_string(),
            draft.description_ref().map(|d| d.to_string()),
            draft.priority_ref(),
            draft.status_ref().unwrap_or(TaskStatus::Pending),
            *draft.deadline_ref(),
            now,
            now,
        );

        self.tasks.lock().unwrap().push(task.clone());
        log::debug!("Guest store created task {}", task.id());
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, Error> {
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_update_task()?;
        }

        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|task| task.id() == id) {
            None => Err(Error::NotFound(id.clone())),
            Some(task) => {
                task.apply_patch(&patch);
                task.touch();
                Ok(task.clone())
            }
        }
    }

    async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task, Error> {
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_update_task_status()?;
        }

        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|task| task.id() == id) {
            None => Err(Error::NotFound(id.clone())),
            Some(task) => {
                task.set_status(status);
                task.touch();
                Ok(task.clone())
            }
        }
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Error> {
        if let Some(mock) = &self.mock_behaviour {
            mock.lock().unwrap().can_delete_task()?;
        }

        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter().position(|task| task.id() == id) {
            None => Err(Error::NotFound(id.clone())),
            Some(index) => {
                tasks.remove(index);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_by_status(tasks: &[Task], status: TaskStatus) -> usize {
        tasks.iter().filter(|t| t.status() == status).count()
    }

    #[tokio::test]
    async fn seeded_store_has_two_tasks_per_column() {
        let store = GuestStore::new();
        let tasks = store.list_tasks(None, None).await.unwrap();
        assert_eq!(tasks.len(), 6);
        assert_eq!(count_by_status(&tasks, TaskStatus::Pending), 2);
        assert_eq!(count_by_status(&tasks, TaskStatus::InProgress), 2);
        assert_eq!(count_by_status(&tasks, TaskStatus::Done), 2);
    }

    #[tokio::test]
    async fn filters_are_accepted_but_ignored() {
        let store = GuestStore::new();
        let unfiltered = store.list_tasks(None, None).await.unwrap();
        let filtered = store.list_tasks(Some(1), Some(2025)).await.unwrap();
        assert_eq!(unfiltered.len(), filtered.len());
    }

    #[tokio::test]
    async fn create_fills_in_store_authored_fields() {
        let store = GuestStore::new();
        let deadline = Utc::now() + Duration::days(7);
        let created = store
            .create_task(TaskDraft::new("X", Priority::High, deadline))
            .await
            .unwrap();

        assert!(!created.id().as_str().is_empty());
        assert_eq!(created.status(), TaskStatus::Pending);
        assert_eq!(created.priority(), Priority::High);
        assert_eq!(created.deadline(), &deadline);

        let tasks = store.list_tasks(None, None).await.unwrap();
        assert_eq!(tasks.len(), 7);
        // Insertion order: the new task comes last
        assert_eq!(tasks.last().unwrap().id(), created.id());
    }

    #[tokio::test]
    async fn update_keeps_id_and_untouched_fields() {
        let store = GuestStore::new();
        let id = TaskId::from("mock-1");
        let updated = store
            .update_task(&id, TaskPatch::new().set_title("Renamed"))
            .await
            .unwrap();
        assert_eq!(updated.id(), &id);
        assert_eq!(updated.title(), "Renamed");
        assert_eq!(updated.priority(), Priority::High);
    }

    #[tokio::test]
    async fn missing_ids_yield_not_found_and_leave_the_store_unchanged() {
        let store = GuestStore::new();
        let ghost = TaskId::from("mock-nope");

        let err = store.update_task(&ghost, TaskPatch::new()).await.unwrap_err();
        assert!(err.is_not_found());

        let err = store.update_task_status(&ghost, TaskStatus::Done).await.unwrap_err();
        assert!(err.is_not_found());

        let err = store.delete_task(&ghost).await.unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(store.list_tasks(None, None).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn a_fresh_store_is_pristine_whatever_happened_to_another_one() {
        let first = GuestStore::new();
        first.delete_task(&TaskId::from("mock-1")).await.unwrap();
        first
            .update_task_status(&TaskId::from("mock-2"), TaskStatus::Done)
            .await
            .unwrap();
        first.clear();

        let second = GuestStore::new();
        let tasks = second.list_tasks(None, None).await.unwrap();
        assert_eq!(tasks.len(), 6);
        assert_eq!(count_by_status(&tasks, TaskStatus::Pending), 2);
        assert_eq!(tasks[0].id(), &TaskId::from("mock-1"));
    }

    #[tokio::test]
    async fn mocked_store_fails_on_demand() {
        let mock = Arc::new(Mutex::new(MockBehaviour::fail_now(1)));
        let store = GuestStore::with_mock_behaviour(mock);

        let err = store
            .update_task_status(&TaskId::from("mock-1"), TaskStatus::Done)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));

        // The second attempt goes through
        let task = store
            .update_task_status(&TaskId::from("mock-1"), TaskStatus::Done)
            .await
            .unwrap();
        assert_eq!(task.status(), TaskStatus::Done);
    }
}
