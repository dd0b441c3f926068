use async_trait::async_trait;

use crate::error::Error;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};

/// A source of tasks.
///
/// There are two implementations: [`Client`](crate::client::Client) talks to the remote
/// REST API, [`GuestStore`](crate::guest::GuestStore) keeps everything in memory.
/// A [`Session`](crate::session::Session) picks one of them once, at construction time,
/// so callers never branch on the session mode themselves.
///
/// Every operation is asynchronous: it may suspend on network I/O. The guest store
/// resolves immediately but keeps the same contract so callers need no special casing.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Return the tasks this source contains.
    ///
    /// In authenticated mode the optional month (1-12) and year filters are forwarded
    /// to the server, which does the filtering. The guest store accepts them but
    /// returns its full contents regardless (see [`GuestStore`](crate::guest::GuestStore)).
    async fn list_tasks(&self, month: Option<u32>, year: Option<i32>) -> Result<Vec<Task>, Error>;

    /// Create a task from a draft and return it with its store-assigned
    /// id and timestamps filled in. The status defaults to `Pending` when
    /// the draft does not request one.
    async fn create_task(&self, draft: TaskDraft) -> Result<Task, Error>;

    /// Apply a partial update and return the updated task.
    /// Fails with `NotFound` when the id is absent from this source.
    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, Error>;

    /// Rewrite only the status of a task and return it.
    /// Fails with `NotFound` when the id is absent from this source.
    async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task, Error>;

    /// Delete a task. Fails with `NotFound` when the id is absent from this source.
    async fn delete_task(&self, id: &TaskId) -> Result<(), Error>;
}
