use actix_web::{get, post, web, HttpResponse};

use crate::{
    auth::{CurrentUser, MaybeUser},
    backend::Backend,
    config::Config,
    error::AppError,
    models::{AddTodoForm, NewTodo},
    routes::see_other,
    views,
};

/// Who may delete a todo by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// A session is required and only the caller's own row is removed.
    OwnerOnly,
    /// Any caller, signed in or not, can delete any row by id.
    Unrestricted,
}

impl DeletePolicy {
    pub fn from_config(config: &Config) -> Self {
        if config.enforce_delete_ownership {
            DeletePolicy::OwnerOnly
        } else {
            DeletePolicy::Unrestricted
        }
    }
}

/// Lists the signed-in user's todos.
///
/// The backend is asked for ascending id order; rows are sorted again here so the
/// page order does not depend on the backend honouring it.
///
/// ## Responses:
/// - `200 OK`: the home page.
/// - `303 See Other` to `/`: no session, or the backend rejected the session's token
///   (the cookie is cleared).
/// - `502 Bad Gateway`: the backend call failed.
#[get("/home")]
pub async fn list_todos(
    user: CurrentUser,
    backend: web::Data<dyn Backend>,
) -> Result<HttpResponse, AppError> {
    let mut todos = backend.list_todos(user.access_token(), user.id()).await?;
    todos.sort_by_key(|todo| todo.id);

    Ok(HttpResponse::Ok()
        .content_type(views::HTML_CONTENT_TYPE)
        .body(views::home(user.email(), &todos)))
}

/// Inserts a new, incomplete todo owned by the signed-in user.
#[post("/add")]
pub async fn add_todo(
    user: CurrentUser,
    backend: web::Data<dyn Backend>,
    form: web::Form<AddTodoForm>,
) -> Result<HttpResponse, AppError> {
    let todo = NewTodo::new(form.into_inner().title, user.id());
    backend.insert_todo(user.access_token(), &todo).await?;
    Ok(see_other("/home"))
}

/// Flips the completion flag through the `completion_toggle` remote procedure,
/// which also checks that the todo belongs to the caller.
#[get("/update/{id}")]
pub async fn toggle_todo(
    user: CurrentUser,
    backend: web::Data<dyn Backend>,
    todo_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    backend
        .toggle_completion(user.access_token(), todo_id.into_inner(), user.id())
        .await?;
    Ok(see_other("/home"))
}

/// Deletes a todo by id, subject to the configured `DeletePolicy`.
///
/// ## Responses:
/// - `303 See Other` to `/home`: the delete request was accepted by the backend.
/// - `303 See Other` to `/`: `OwnerOnly` policy and no session. No backend call is made.
/// - `502 Bad Gateway`: the backend call failed.
#[get("/delete/{id}")]
pub async fn delete_todo(
    user: MaybeUser,
    policy: web::Data<DeletePolicy>,
    backend: web::Data<dyn Backend>,
    todo_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let todo_id = todo_id.into_inner();
    let claims = user.0;
    let owner = match (*policy.get_ref(), &claims) {
        (DeletePolicy::OwnerOnly, Some(claims)) => Some(claims.user_id()),
        (DeletePolicy::OwnerOnly, None) => return Err(AppError::Unauthenticated),
        (DeletePolicy::Unrestricted, None) => {
            log::warn!("anonymous delete of todo {} allowed by policy", todo_id);
            None
        }
        (DeletePolicy::Unrestricted, Some(_)) => None,
    };
    let access_token = claims.as_ref().map(|claims| claims.access_token.as_str());

    backend.delete_todo(access_token, todo_id, owner).await?;
    Ok(see_other("/home"))
}
