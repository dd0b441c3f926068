//! Tasks, and the wire-level DTOs used to create and modify them

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque task identifier, assigned by the data source that owns the task
/// (the server in authenticated mode, the guest store in guest mode).
///
/// It is immutable for the whole lifetime of the task.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId, the way the guest store issues them
    pub fn random_guest() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: format!("mock-{}", random) }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// The priority of a task, serialized with the `LOW`/`MEDIUM`/`HIGH` wire tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// The status of a task, as the backend understands it
/// (serialized with the `PENDING`/`IN_PROGRESS`/`DONE` wire tokens).
///
/// UI-facing code rather deals with [`Column`](crate::board::Column)s, an isomorphic set.
/// A wire token this crate does not know about deserializes to `Pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Parse a wire token. Unknown tokens map to `Pending`.
    pub fn from_wire(token: &str) -> Self {
        match token {
            "IN_PROGRESS" => TaskStatus::InProgress,
            "DONE" => TaskStatus::Done,
            _ => TaskStatus::Pending,
        }
    }
}

/// Used to support serde
impl Serialize for TaskStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D>(deserializer: D) -> Result<TaskStatus, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(TaskStatus::from_wire(&token))
    }
}

/// A task, as returned by one of the two data sources.
///
/// All fields are store-authored: clients never pick an `id` nor timestamps themselves
/// (the guest store simulates server authorship locally).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    priority: Priority,
    status: TaskStatus,
    deadline: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a Task from parts. This is how data sources materialize tasks;
    /// API users rather go through [`TaskDraft`] and let the active source assign the rest.
    pub fn new_with_parameters(id: TaskId, title: String, description: Option<String>,
                               priority: Priority, status: TaskStatus,
                               deadline: DateTime<Utc>,
                               created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
                            ) -> Self
    {
        Self { id, title, description, priority, status, deadline, created_at, updated_at }
    }

    pub fn id(&self) -> &TaskId           { &self.id          }
    pub fn title(&self) -> &str           { &self.title       }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn priority(&self) -> Priority    { self.priority     }
    pub fn status(&self) -> TaskStatus    { self.status       }
    pub fn deadline(&self) -> &DateTime<Utc>   { &self.deadline   }
    pub fn created_at(&self) -> &DateTime<Utc> { &self.created_at }
    pub fn updated_at(&self) -> &DateTime<Utc> { &self.updated_at }

    /// Rewrite the status in place. This does not touch `updated_at`: only the
    /// owning store authors timestamps, a board doing an optimistic move does not.
    pub fn set_status(&mut self, new_status: TaskStatus) {
        self.status = new_status;
    }

    /// Apply a partial update. Fields absent from the patch are left unchanged.
    pub(crate) fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = patch.title() {
            self.title = title.to_string();
        }
        if let Some(description) = patch.description() {
            self.description = Some(description.to_string());
        }
        if let Some(priority) = patch.priority() {
            self.priority = priority;
        }
        if let Some(deadline) = patch.deadline() {
            self.deadline = *deadline;
        }
        if let Some(status) = patch.status() {
            self.status = status;
        }
    }

    /// Update `updated_at` to now. Reserved to the owning store.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The fields needed to create a task (`POST /tasks` request body).
///
/// `id`, `createdAt` and `updatedAt` are assigned by the active data source.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    priority: Priority,
    deadline: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
}

impl TaskDraft {
    pub fn new<S: ToString>(title: S, priority: Priority, deadline: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            priority,
            deadline,
            status: None,
        }
    }

    pub fn description<S: ToString>(mut self, description: S) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Request an initial status other than the default.
    /// Absent, both sources default the new task to [`TaskStatus::Pending`].
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn title_ref(&self) -> &str            { &self.title }
    pub fn description_ref(&self) -> Option<&str> { self.description.as_deref() }
    pub fn priority_ref(&self) -> Priority     { self.priority }
    pub fn deadline_ref(&self) -> &DateTime<Utc> { &self.deadline }
    pub fn status_ref(&self) -> Option<TaskStatus> { self.status }
}

/// A partial update to an existing task (`PUT /tasks/{id}` request body).
/// Every field is optional; absent fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title<S: ToString>(mut self, title: S) -> Self {
        self.title = Some(title.to_string());
        self
    }
    pub fn set_description<S: ToString>(mut self, description: S) -> Self {
        self.description = Some(description.to_string());
        self
    }
    pub fn set_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
    pub fn set_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
    pub fn set_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn title(&self) -> Option<&str>       { self.title.as_deref() }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn priority(&self) -> Option<Priority> { self.priority }
    pub fn deadline(&self) -> Option<&DateTime<Utc>> { self.deadline.as_ref() }
    pub fn status(&self) -> Option<TaskStatus> { self.status }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_tokens() {
        assert_eq!(serde_json::to_string(&TaskStatus::Pending).unwrap(), r#""PENDING""#);
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), r#""IN_PROGRESS""#);
        assert_eq!(serde_json::to_string(&TaskStatus::Done).unwrap(), r#""DONE""#);

        let parsed: TaskStatus = serde_json::from_str(r#""IN_PROGRESS""#).unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    #[test]
    fn unknown_status_token_defaults_to_pending() {
        let parsed: TaskStatus = serde_json::from_str(r#""ARCHIVED""#).unwrap();
        assert_eq!(parsed, TaskStatus::Pending);
    }

    #[test]
    fn priority_wire_tokens() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), r#""HIGH""#);
        let parsed: Priority = serde_json::from_str(r#""LOW""#).unwrap();
        assert_eq!(parsed, Priority::Low);
    }

    #[test]
    fn task_json_uses_camel_case() {
        let json = r#"{
            "id": "abc-123",
            "title": "Write report",
            "description": null,
            "priority": "MEDIUM",
            "status": "PENDING",
            "deadline": "2025-01-01T00:00:00Z",
            "createdAt": "2024-12-30T10:00:00Z",
            "updatedAt": "2024-12-31T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id().as_str(), "abc-123");
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(task.description(), None);

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["createdAt"], "2024-12-30T10:00:00Z");
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut task = Task::new_with_parameters(
            TaskId::from("t-1"), "Initial".to_string(), Some("desc".to_string()),
            Priority::Low, TaskStatus::Pending,
            Utc::now(), Utc::now(), Utc::now(),
        );
        task.apply_patch(&TaskPatch::new().set_priority(Priority::High));
        assert_eq!(task.priority(), Priority::High);
        assert_eq!(task.title(), "Initial");
        assert_eq!(task.description(), Some("desc"));
        assert_eq!(task.status(), TaskStatus::Pending);
    }

    #[test]
    fn guest_ids_are_unique_and_prefixed() {
        let a = TaskId::random_guest();
        let b = TaskId::random_guest();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("mock-"));
    }
}
