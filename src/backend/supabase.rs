use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

use super::{AuthError, AuthSession, AuthUser, Backend, BackendError, Credentials};
use crate::models::{NewTodo, Todo};

const TODOS_TABLE: &str = "todos";
const TOGGLE_PROCEDURE: &str = "completion_toggle";

/// `reqwest` client for a Supabase project: PostgREST under `/rest/v1`,
/// GoTrue under `/auth/v1`.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Shape shared by the token and signup endpoints. Signup without an issued
/// session returns the bare user object, so both fields are optional.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
    user: Option<AuthUser>,
}

impl SessionResponse {
    fn into_session(self) -> Option<AuthSession> {
        match (self.access_token, self.user) {
            (Some(access_token), Some(user)) => Some(AuthSession { access_token, user }),
            _ => None,
        }
    }
}

impl SupabaseClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Every call carries the project key as `apikey`. `bearer` is the signed-in
    /// user's access token; without one the project key is sent as the bearer too.
    fn request(&self, method: Method, url: String, bearer: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer.unwrap_or(self.api_key.as_str()))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn auth_call(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<(StatusCode, String), AuthError> {
        let response = self
            .request(Method::POST, self.auth_url(path), None)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::ServiceError(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::ServiceError(e.to_string()))?;
        Ok((status, body))
    }
}

fn parse_session(body: &str) -> Result<Option<AuthSession>, AuthError> {
    serde_json::from_str::<SessionResponse>(body)
        .map(SessionResponse::into_session)
        .map_err(|e| AuthError::ServiceError(format!("malformed auth response: {}", e)))
}

fn mentions_existing_user(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    body.contains("already registered") || body.contains("already exists")
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn list_todos(
        &self,
        access_token: &str,
        user_id: Uuid,
    ) -> Result<Vec<Todo>, BackendError> {
        let owner = format!("eq.{}", user_id);
        let builder = self
            .request(Method::GET, self.rest_url(TODOS_TABLE), Some(access_token))
            .query(&[("select", "*"), ("user_id", owner.as_str()), ("order", "id.asc")]);
        let todos = self.send(builder).await?.json::<Vec<Todo>>().await?;
        Ok(todos)
    }

    async fn insert_todo(&self, access_token: &str, todo: &NewTodo) -> Result<(), BackendError> {
        let builder = self
            .request(Method::POST, self.rest_url(TODOS_TABLE), Some(access_token))
            .header("Prefer", "return=minimal")
            .json(todo);
        self.send(builder).await?;
        Ok(())
    }

    async fn toggle_completion(
        &self,
        access_token: &str,
        todo_id: i64,
        user_id: Uuid,
    ) -> Result<(), BackendError> {
        let url = self.rest_url(&format!("rpc/{}", TOGGLE_PROCEDURE));
        let builder = self
            .request(Method::POST, url, Some(access_token))
            .json(&json!({ "todo_id": todo_id, "u_id": user_id }));
        self.send(builder).await?;
        Ok(())
    }

    async fn delete_todo(
        &self,
        access_token: Option<&str>,
        todo_id: i64,
        owner: Option<Uuid>,
    ) -> Result<(), BackendError> {
        let mut filters = vec![("id", format!("eq.{}", todo_id))];
        if let Some(owner) = owner {
            filters.push(("user_id", format!("eq.{}", owner)));
        }
        let builder = self
            .request(Method::DELETE, self.rest_url(TODOS_TABLE), access_token)
            .query(&filters);
        self.send(builder).await?;
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, AuthError> {
        let (status, body) = self
            .auth_call("token?grant_type=password", credentials)
            .await?;
        match status {
            s if s.is_success() => parse_session(&body)?.ok_or_else(|| {
                AuthError::ServiceError("token endpoint returned no session".to_string())
            }),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(AuthError::InvalidCredentials)
            }
            other => Err(AuthError::ServiceError(format!("{}: {}", other, body))),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<AuthSession>, AuthError> {
        let (status, body) = self.auth_call("signup", credentials).await?;
        if status.is_success() {
            return parse_session(&body);
        }
        if status.is_client_error() && mentions_existing_user(&body) {
            return Err(AuthError::AlreadyExists);
        }
        Err(AuthError::ServiceError(format!("{}: {}", status, body)))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let builder = self.request(Method::POST, self.auth_url("logout"), Some(access_token));
        self.send(builder).await?;
        Ok(())
    }
}
