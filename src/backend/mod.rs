//! The remote backend seam.
//!
//! Every piece of real work (password auth, table storage, the completion toggle
//! procedure) happens in a hosted backend. Handlers only see the [`Backend`] trait,
//! which is injected as `web::Data<dyn Backend>`; production wires in
//! [`SupabaseClient`], tests wire in a recording double.

pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::{NewTodo, Todo};

pub use supabase::SupabaseClient;

/// Email/password pair forwarded to the backend's auth service.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The identity the backend vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in backend session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

/// Why a sign-in or sign-up did not produce a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    AlreadyExists,
    ServiceError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "invalid credentials"),
            AuthError::AlreadyExists => write!(f, "account already exists"),
            AuthError::ServiceError(msg) => write!(f, "auth service error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// A failed data call (list, insert, toggle, delete, sign-out).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced a response (connect, timeout, TLS).
    Transport(String),
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body did not have the expected shape.
    Decode(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(msg) => write!(f, "transport error: {}", msg),
            BackendError::Status { status, body } => {
                write!(f, "backend returned {}: {}", status, body)
            }
            BackendError::Decode(msg) => write!(f, "unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            BackendError::Decode(error.to_string())
        } else {
            BackendError::Transport(error.to_string())
        }
    }
}

/// Data calls take the signed-in user's backend access token so that row-level
/// security sees the user, not the project key. A 401 on a data call means that
/// token is no longer accepted.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All todos owned by `user_id`, ordered by ascending id.
    async fn list_todos(&self, access_token: &str, user_id: Uuid)
        -> Result<Vec<Todo>, BackendError>;

    async fn insert_todo(&self, access_token: &str, todo: &NewTodo) -> Result<(), BackendError>;

    /// Invokes the `completion_toggle` remote procedure. Ownership is checked remotely.
    async fn toggle_completion(
        &self,
        access_token: &str,
        todo_id: i64,
        user_id: Uuid,
    ) -> Result<(), BackendError>;

    /// Deletes the row with `todo_id`; when `owner` is given the row must also belong to it.
    /// Anonymous callers pass no token and the call goes out with the project key.
    async fn delete_todo(
        &self,
        access_token: Option<&str>,
        todo_id: i64,
        owner: Option<Uuid>,
    ) -> Result<(), BackendError>;

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, AuthError>;

    /// Registers an account. `Ok(None)` means the backend accepted the request but
    /// issued no session.
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<AuthSession>, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("ada@example.com"));
        assert!(!rendered.contains("hunter2"));
    }
}
