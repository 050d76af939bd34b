#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{test, web, App};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use tallylist::auth::{SessionConfig, SessionMiddleware, SESSION_COOKIE};
use tallylist::backend::{
    AuthError, AuthSession, AuthUser, Backend, BackendError, Credentials,
};
use tallylist::models::{NewTodo, Todo};
use tallylist::routes::{self, DeletePolicy};

pub const SECRET: &str = "integration_test_secret";

/// One backend call as observed by `MockBackend`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListTodos(Uuid),
    InsertTodo(NewTodo),
    ToggleCompletion { todo_id: i64, user_id: Uuid },
    DeleteTodo { todo_id: i64, owner: Option<Uuid> },
    SignIn(String),
    SignUp(String),
    SignOut(String),
}

/// Records every call and answers from canned results.
pub struct MockBackend {
    calls: Mutex<Vec<Call>>,
    todos: Mutex<Vec<Todo>>,
    sign_in: Mutex<Result<AuthSession, AuthError>>,
    sign_up: Mutex<Result<Option<AuthSession>, AuthError>>,
    bearers: Mutex<Vec<Option<String>>>,
    sign_out_fails: AtomicBool,
    data_fails: AtomicBool,
    token_rejected: AtomicBool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            todos: Mutex::new(Vec::new()),
            sign_in: Mutex::new(Err(AuthError::InvalidCredentials)),
            sign_up: Mutex::new(Ok(None)),
            bearers: Mutex::new(Vec::new()),
            sign_out_fails: AtomicBool::new(false),
            data_fails: AtomicBool::new(false),
            token_rejected: AtomicBool::new(false),
        }
    }
}

impl MockBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
        self.bearers.lock().unwrap().clear();
    }

    /// The access token each data call carried, in call order.
    pub fn bearers(&self) -> Vec<Option<String>> {
        self.bearers.lock().unwrap().clone()
    }

    pub fn set_todos(&self, todos: Vec<Todo>) {
        *self.todos.lock().unwrap() = todos;
    }

    pub fn set_sign_in(&self, result: Result<AuthSession, AuthError>) {
        *self.sign_in.lock().unwrap() = result;
    }

    pub fn set_sign_up(&self, result: Result<Option<AuthSession>, AuthError>) {
        *self.sign_up.lock().unwrap() = result;
    }

    pub fn fail_sign_out(&self) {
        self.sign_out_fails.store(true, Ordering::SeqCst);
    }

    pub fn fail_data_calls(&self) {
        self.data_fails.store(true, Ordering::SeqCst);
    }

    /// Data calls answer 401, as the backend does for an expired access token.
    pub fn reject_tokens(&self) {
        self.token_rejected.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn record_data(&self, access_token: Option<&str>, call: Call) {
        self.bearers
            .lock()
            .unwrap()
            .push(access_token.map(str::to_string));
        self.record(call);
    }

    fn data_result(&self) -> Result<(), BackendError> {
        if self.token_rejected.load(Ordering::SeqCst) {
            Err(BackendError::Status {
                status: 401,
                body: "JWT expired".to_string(),
            })
        } else if self.data_fails.load(Ordering::SeqCst) {
            Err(BackendError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_todos(
        &self,
        access_token: &str,
        user_id: Uuid,
    ) -> Result<Vec<Todo>, BackendError> {
        self.record_data(Some(access_token), Call::ListTodos(user_id));
        self.data_result()?;
        Ok(self
            .todos
            .lock()
            .unwrap()
            .iter()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_todo(&self, access_token: &str, todo: &NewTodo) -> Result<(), BackendError> {
        self.record_data(Some(access_token), Call::InsertTodo(todo.clone()));
        self.data_result()
    }

    async fn toggle_completion(
        &self,
        access_token: &str,
        todo_id: i64,
        user_id: Uuid,
    ) -> Result<(), BackendError> {
        self.record_data(Some(access_token), Call::ToggleCompletion { todo_id, user_id });
        self.data_result()
    }

    async fn delete_todo(
        &self,
        access_token: Option<&str>,
        todo_id: i64,
        owner: Option<Uuid>,
    ) -> Result<(), BackendError> {
        self.record_data(access_token, Call::DeleteTodo { todo_id, owner });
        self.data_result()
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, AuthError> {
        self.record(Call::SignIn(credentials.email.clone()));
        self.sign_in.lock().unwrap().clone()
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<AuthSession>, AuthError> {
        self.record(Call::SignUp(credentials.email.clone()));
        self.sign_up.lock().unwrap().clone()
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.record(Call::SignOut(access_token.to_string()));
        if self.sign_out_fails.load(Ordering::SeqCst) {
            return Err(BackendError::Status {
                status: 500,
                body: "sign-out exploded".to_string(),
            });
        }
        Ok(())
    }
}

pub fn session_config() -> SessionConfig {
    SessionConfig::new(SECRET, 24, false)
}

pub fn auth_session(email: &str) -> AuthSession {
    AuthSession {
        access_token: format!("backend-jwt-for-{}", email),
        user: AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        },
    }
}

/// A session cookie as the app would have issued it after login.
pub fn signed_in_cookie(session: &AuthSession) -> Cookie<'static> {
    session_config().cookie(session).unwrap()
}

pub async fn init_app(
    backend: Arc<MockBackend>,
    policy: DeletePolicy,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let backend: web::Data<dyn Backend> = web::Data::from(backend as Arc<dyn Backend>);
    test::init_service(
        App::new()
            .app_data(backend)
            .app_data(web::Data::new(session_config()))
            .app_data(web::Data::new(policy))
            .wrap(SessionMiddleware::new(session_config()))
            .configure(routes::config),
    )
    .await
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

pub fn todo(id: i64, title: &str, complete: bool, user_id: Uuid) -> Todo {
    Todo {
        id,
        title: title.to_string(),
        complete,
        user_id,
    }
}
