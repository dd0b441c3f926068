//! This crate is a client for the Kando task-management REST API.
//!
//! It provides an HTTP client in the [`client`] module, that can be used as a stand-alone module.
//!
//! Because users may want to try the app without an account, this crate also provides a local
//! "guest mode" store in the [`guest`] module, seeded with demo data and never persisted.
//!
//! These two data sources implement the same [`TaskSource`](traits::TaskSource) trait; a
//! [`Session`] picks one of them once, at construction time. \
//! On top of either source, a [`Board`] maintains the kanban view of the task list: status
//! moves are applied optimistically (the UI sees them before the server answers) and rolled
//! back if the source rejects them.

pub mod traits;

mod task;
pub use task::{Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
pub mod board;
pub use board::{Board, Column};
mod error;
pub use error::Error;
pub mod session;
pub use session::Session;

pub mod client;
pub use client::Client;
pub mod guest;
pub use guest::GuestStore;

pub mod mock_behaviour;

pub mod config;
pub mod utils;
