//! The kanban board: the client-side view of the task list, kept consistent
//! with the active data source under optimistic concurrency
//!
//! Status moves (drag-and-drop, or an explicit "move" action) are applied to the
//! local state *before* the source answers, so the UI never waits on the network.
//! Each in-flight move holds a snapshot of the status it replaced; if the source
//! rejects the move, that snapshot (and only that one) is restored.
//! Creations, updates and deletions are pessimistic: local state only changes
//! once the source has answered.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use crate::traits::TaskSource;

/// A board column, the UI-facing side of the status mapping
/// (`todo` / `in-progress` / `done`).
///
/// `Column` and [`TaskStatus`] are isomorphic; converting back and forth
/// is total and stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Todo,
    InProgress,
    Done,
}

impl Column {
    /// Every column, in board order
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Done];

    pub fn as_name(&self) -> &'static str {
        match self {
            Column::Todo => "todo",
            Column::InProgress => "in-progress",
            Column::Done => "done",
        }
    }

    /// Parse a column name. Unknown names map to `Todo`,
    /// the same default the status mapping uses for unknown wire tokens.
    pub fn from_name(name: &str) -> Self {
        match name {
            "in-progress" => Column::InProgress,
            "done" => Column::Done,
            _ => Column::Todo,
        }
    }
}

impl From<TaskStatus> for Column {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => Column::Todo,
            TaskStatus::InProgress => Column::InProgress,
            TaskStatus::Done => Column::Done,
        }
    }
}

impl From<Column> for TaskStatus {
    fn from(column: Column) -> Self {
        match column {
            Column::Todo => TaskStatus::Pending,
            Column::InProgress => TaskStatus::InProgress,
            Column::Done => TaskStatus::Done,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_name())
    }
}

/// The snapshot an in-flight move keeps around so it can be rolled back.
///
/// The ticket ties a settlement to the exact invocation that created it: when a
/// second move on the same task starts before the first one settles, the first
/// one is superseded and must neither commit nor roll anything back.
#[derive(Debug)]
struct PendingMove {
    previous: TaskStatus,
    ticket: u64,
}

#[derive(Debug, Default)]
struct BoardState {
    tasks: Vec<Task>,
    pending_moves: HashMap<TaskId, PendingMove>,
    last_error: Option<String>,
    next_ticket: u64,
}

/// The client-side board state over a [`TaskSource`].
///
/// There is no per-column storage: columns are views computed by filtering on
/// status, so a task can never sit in two columns at once. Several moves may be
/// in flight concurrently (one per task being moved); each settles independently.
/// Two rapid moves of the *same* task race, and the last source answer to land
/// wins; this mirrors the upstream behaviour and is deliberate.
#[derive(Clone)]
pub struct Board {
    source: Arc<dyn TaskSource>,
    state: Arc<Mutex<BoardState>>,
}

impl Board {
    /// Create an empty board over the given source. Call [`Board::refresh`] to populate it.
    pub fn new(source: Arc<dyn TaskSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(BoardState::default())),
        }
    }

    /// Replace the board contents with what the source currently holds.
    ///
    /// The filters are forwarded to the source (the guest store ignores them).
    /// Any in-flight move snapshot is discarded: the fetched state is authoritative,
    /// so a stale rollback must not fire on top of it.
    pub async fn refresh(&self, month: Option<u32>, year: Option<i32>) -> Result<(), Error> {
        match self.source.list_tasks(month, year).await {
            Ok(tasks) => {
                let mut state = self.state.lock().unwrap();
                state.tasks = tasks;
                state.pending_moves.clear();
                Ok(())
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Move a task to another column.
    ///
    /// The local status is rewritten immediately (optimistic step), then the source
    /// is asked to confirm. On success the local state is already correct. On failure
    /// the status is restored to the snapshot taken by *this* invocation, unless a
    /// later move on the same task has superseded it, and the error is recorded.
    ///
    /// Moving a task to the column it is already in is a no-op: no source call,
    /// no state change.
    pub async fn move_task(&self, id: &TaskId, target: Column) -> Result<(), Error> {
        let ticket = {
            let mut state = self.state.lock().unwrap();

            let previous = match state.tasks.iter().find(|task| task.id() == id) {
                None => {
                    let err = Error::NotFound(id.clone());
                    state.last_error = Some(err.to_string());
                    return Err(err);
                }
                Some(task) => task.status(),
            };
            if Column::from(previous) == target {
                log::debug!("Task {} is already in column {}", id, target);
                return Ok(());
            }

            let ticket = state.next_ticket;
            state.next_ticket += 1;

            // Optimistic step: the UI sees the move before the source has answered
            if let Some(task) = state.tasks.iter_mut().find(|task| task.id() == id) {
                task.set_status(TaskStatus::from(target));
            }
            state.pending_moves.insert(id.clone(), PendingMove { previous, ticket });
            ticket
        };

        match self.source.update_task_status(id, TaskStatus::from(target)).await {
            Ok(_task) => {
                let mut state = self.state.lock().unwrap();
                if state.pending_moves.get(id).map(|p| p.ticket) == Some(ticket) {
                    state.pending_moves.remove(id);
                }
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.lock().unwrap();
                let still_current =
                    state.pending_moves.get(id).map(|p| p.ticket) == Some(ticket);
                if still_current {
                    let pending = state.pending_moves.remove(id)
                        .unwrap(/* cannot fail, we've just checked the entry is there */);
                    if let Some(task) = state.tasks.iter_mut().find(|task| task.id() == id) {
                        task.set_status(pending.previous);
                    }
                } else {
                    log::debug!("Move of task {} was superseded, not rolling back", id);
                }
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Create a task through the source and append the returned, authoritative
    /// task to the board. Pessimistic: a failure leaves the board untouched.
    pub async fn create_task(&self, draft: TaskDraft) -> Result<Task, Error> {
        match self.source.create_task(draft).await {
            Ok(task) => {
                self.state.lock().unwrap().tasks.push(task.clone());
                Ok(task)
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Apply a partial update through the source, then replace the local copy with
    /// the returned task. Pessimistic: a failure leaves the board untouched.
    pub async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, Error> {
        match self.source.update_task(id, patch).await {
            Ok(task) => {
                let mut state = self.state.lock().unwrap();
                match state.tasks.iter_mut().find(|t| t.id() == id) {
                    Some(slot) => *slot = task.clone(),
                    None => state.tasks.push(task.clone()),
                }
                Ok(task)
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Delete a task through the source, then drop it from the board.
    /// Pessimistic: a failure leaves the board untouched.
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), Error> {
        match self.source.delete_task(id).await {
            Ok(()) => {
                let mut state = self.state.lock().unwrap();
                state.tasks.retain(|task| task.id() != id);
                state.pending_moves.remove(id);
                Ok(())
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// A snapshot of every task on the board, in insertion order
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    /// The tasks currently sitting in the given column
    pub fn column(&self, column: Column) -> Vec<Task> {
        self.state.lock().unwrap().tasks.iter()
            .filter(|task| Column::from(task.status()) == column)
            .cloned()
            .collect()
    }

    /// Look a task up by id
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.state.lock().unwrap().tasks.iter()
            .find(|task| task.id() == id)
            .cloned()
    }

    /// The message of the last failed operation, if it has not been cleared yet.
    /// A failed operation never corrupts unrelated tasks nor blocks later operations.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.state.lock().unwrap().last_error = None;
    }

    fn record_error(&self, err: &Error) {
        self.state.lock().unwrap().last_error = Some(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_a_bijection() {
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::from(Column::from(status)), status);
        }
        for column in Column::ALL {
            assert_eq!(Column::from(TaskStatus::from(column)), column);
        }
        assert_eq!(Column::from(TaskStatus::Pending), Column::Todo);
    }

    #[test]
    fn column_names() {
        assert_eq!(Column::Todo.to_string(), "todo");
        assert_eq!(Column::InProgress.to_string(), "in-progress");
        assert_eq!(Column::Done.to_string(), "done");

        assert_eq!(Column::from_name("in-progress"), Column::InProgress);
        // Unknown names fall back to the leftmost column, like unknown wire tokens do
        assert_eq!(Column::from_name("blocked"), Column::Todo);
    }
}
