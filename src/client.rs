//! This module provides a client to connect to the Kando REST API

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use crate::traits::TaskSource;

/// A registered user, as returned by the auth endpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    tier: Tier,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn id(&self) -> &str         { &self.id         }
    pub fn email(&self) -> &str      { &self.email      }
    pub fn first_name(&self) -> &str { &self.first_name }
    pub fn last_name(&self) -> &str  { &self.last_name  }
    pub fn tier(&self) -> Tier       { self.tier        }
    pub fn created_at(&self) -> &DateTime<Utc> { &self.created_at }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Free,
    Pro,
}

/// The `POST /auth/login` request body
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new<S: ToString, T: ToString>(email: S, password: T) -> Self {
        Self { email: email.to_string(), password: password.to_string() }
    }
}

/// The `POST /auth/register` request body
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl NewUser {
    pub fn new<S: ToString>(email: S, password: S, first_name: S, last_name: S) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

/// What a successful login returns: the user, plus the bearer token
/// to attach to every subsequent request
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    user: User,
    token: String,
}

impl LoginResponse {
    pub fn user(&self) -> &User   { &self.user  }
    pub fn token(&self) -> &str   { &self.token }
}

#[derive(Serialize)]
struct StatusBody {
    status: TaskStatus,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

/// A task source that fetches its data from the remote REST API.
///
/// The bearer token (if any) is attached to every request. The client never
/// decides anything by itself: ids, timestamps and the authoritative status
/// of every task come from the server.
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Mutex<Option<String>>,
}

impl Client {
    /// Create a client for the given API base URL. This does not start a connection.
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.as_ref())?;
        let http = reqwest::Client::builder()
            .timeout(crate::config::REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url,
            http,
            token: Mutex::new(None),
        })
    }

    /// Create a client pointing at [`config::API_BASE_URL`](crate::config::API_BASE_URL)
    pub fn from_config() -> Result<Self, Error> {
        let base_url = crate::config::API_BASE_URL.lock().unwrap().clone();
        Self::new(base_url)
    }

    /// Attach a bearer token obtained out-of-band (e.g. restored from a credential store)
    pub fn set_token<S: ToString>(&self, token: S) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    /// Forget the bearer token. Subsequent requests are unauthenticated.
    pub fn logout(&self) {
        log::debug!("Discarding the bearer token");
        *self.token.lock().unwrap() = None;
    }

    /// Register a new user account
    pub async fn register(&self, new_user: &NewUser) -> Result<User, Error> {
        let url = self.endpoint("/auth/register")?;
        let response = self.execute(self.http.post(url).json(new_user)).await?;
        Ok(response.json().await?)
    }

    /// Log in, and keep the returned bearer token for subsequent requests
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, Error> {
        let url = self.endpoint("/auth/login")?;
        let response = self.execute(self.http.post(url).json(credentials)).await?;
        let login: LoginResponse = response.json().await?;
        self.set_token(&login.token);
        log::info!("Logged in as {}", login.user.email());
        Ok(login)
    }

    /// Ask the server for a throwaway guest account.
    ///
    /// Note that this is distinct from the local guest mode
    /// ([`Session::guest`](crate::session::Session::guest)), which never touches the network.
    pub async fn guest_login(&self) -> Result<LoginResponse, Error> {
        let url = self.endpoint("/auth/guest")?;
        let response = self.execute(self.http.post(url)).await?;
        let login: LoginResponse = response.json().await?;
        self.set_token(&login.token);
        Ok(login)
    }

    /// Check the stored bearer token is still valid, returning the user it belongs to
    pub async fn verify_token(&self) -> Result<User, Error> {
        let url = self.endpoint("/auth/verify-token")?;
        let response = self.execute(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Build a full endpoint URL. The base URL carries a path prefix (e.g. `/api/v1`),
    /// so this concatenates rather than `Url::join` (which would swallow the last segment).
    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let full = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Ok(Url::parse(&full)?)
    }

    /// Attach the bearer token and send the request, mapping non-2xx answers
    /// to [`Error::Server`] and everything transport-level to [`Error::Transport`]
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let token = self.token();
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // A rejected token will keep being rejected: drop it so the caller can re-authenticate
        if status == reqwest::StatusCode::UNAUTHORIZED {
            log::warn!("Server rejected the bearer token, discarding it");
            self.logout();
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(decode_error_envelope(status.as_u16(), &body))
    }
}

/// Decode the `{status, message, data?}` failure envelope.
/// A missing or unparseable message falls back to a generic one.
fn decode_error_envelope(status: u16, body: &[u8]) -> Error {
    let message = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| "An error occurred".to_string());
    Error::Server { status, message }
}

#[async_trait]
impl TaskSource for Client {
    async fn list_tasks(&self, month: Option<u32>, year: Option<i32>) -> Result<Vec<Task>, Error> {
        let url = self.endpoint("/tasks")?;
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(month) = month {
            query.push(("month", month.to_string()));
        }
        if let Some(year) = year {
            query.push(("year", year.to_string()));
        }

        let response = self.execute(self.http.get(url).query(&query)).await?;
        Ok(response.json().await?)
    }

    async fn create_task(&self, draft: TaskDraft) -> Result<Task, Error> {
        let url = self.endpoint("/tasks")?;
        let response = self.execute(self.http.post(url).json(&draft)).await?;
        Ok(response.json().await?)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, Error> {
        let url = self.endpoint(&format!("/tasks/{}", id))?;
        let response = self.execute(self.http.put(url).json(&patch)).await?;
        Ok(response.json().await?)
    }

    async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task, Error> {
        let url = self.endpoint(&format!("/tasks/{}/status", id))?;
        let response = self.execute(self.http.patch(url).json(&StatusBody { status })).await?;
        Ok(response.json().await?)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Error> {
        let url = self.endpoint(&format!("/tasks/{}", id))?;
        self.execute(self.http.delete(url)).await?;
        Ok(())
    }
}
