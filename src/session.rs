//! Sessions tie a user (or guest) to the task source their boards will use
//!
//! The source is chosen exactly once, when the session is built. There is no
//! process-wide mode flag: everything downstream of a `Session` is oblivious
//! to whether it is talking to the server or to an in-memory store, and two
//! sessions of different kinds can coexist (which the tests rely on).

use std::sync::Arc;

use crate::board::Board;
use crate::client::{Client, Credentials, NewUser, User};
use crate::error::Error;
use crate::guest::GuestStore;
use crate::traits::TaskSource;

/// An established session: either authenticated against the remote API,
/// or a local guest session over a fresh in-memory store.
pub struct Session {
    /// Kept for authenticated sessions, so logging out can discard the token
    client: Option<Arc<Client>>,
    source: Arc<dyn TaskSource>,
    user: Option<User>,
}

impl Session {
    /// Start a guest session over a freshly seeded [`GuestStore`].
    ///
    /// Nothing leaves the process: no network call is ever made, and the store
    /// is discarded with the session.
    pub fn guest() -> Self {
        log::info!("Starting a guest session");
        Self {
            client: None,
            source: Arc::new(GuestStore::new()),
            user: None,
        }
    }

    /// Build an authenticated session around a client that already carries
    /// a valid bearer token (e.g. one restored from a credential store)
    pub fn authenticated(client: Client, user: Option<User>) -> Self {
        let client = Arc::new(client);
        Self {
            source: client.clone(),
            client: Some(client),
            user,
        }
    }

    /// Log in and build an authenticated session from the response
    pub async fn login(client: Client, credentials: &Credentials) -> Result<Self, Error> {
        let login = client.login(credentials).await?;
        let user = login.user().clone();
        Ok(Self::authenticated(client, Some(user)))
    }

    /// Register a new account, then log it in
    pub async fn register(client: Client, new_user: &NewUser, credentials: &Credentials) -> Result<Self, Error> {
        client.register(new_user).await?;
        Self::login(client, credentials).await
    }

    /// Whether this session runs against the local guest store
    pub fn is_guest(&self) -> bool {
        self.client.is_none()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The task source this session was built around
    pub fn source(&self) -> Arc<dyn TaskSource> {
        self.source.clone()
    }

    /// Create a board over this session's source
    pub fn board(&self) -> Board {
        Board::new(self.source.clone())
    }

    /// End the session. An authenticated session forgets its bearer token;
    /// a guest session takes its whole store with it.
    pub fn logout(self) {
        if let Some(client) = &self.client {
            client.logout();
        }
        log::info!("Session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_sessions_are_guest() {
        let session = Session::guest();
        assert!(session.is_guest());
        assert!(session.user().is_none());
    }

    #[test]
    fn authenticated_sessions_are_not_guest() {
        let client = Client::new("https://kando.example.com/api/v1").unwrap();
        client.set_token("some-token");
        let session = Session::authenticated(client, None);
        assert!(!session.is_guest());
    }

    #[tokio::test]
    async fn two_guest_sessions_do_not_share_a_store() {
        let a = Session::guest();
        let b = Session::guest();

        let board_a = a.board();
        board_a.refresh(None, None).await.unwrap();
        let id = board_a.tasks()[0].id().clone();
        board_a.delete_task(&id).await.unwrap();

        let board_b = b.board();
        board_b.refresh(None, None).await.unwrap();
        assert_eq!(board_a.tasks().len(), 5);
        assert_eq!(board_b.tasks().len(), 6);
    }
}
