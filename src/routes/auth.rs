use actix_web::{http::header, post, web, Error as ActixError, HttpResponse};
use validator::Validate;

use crate::{
    auth::{MaybeUser, SessionConfig},
    backend::{AuthError, AuthSession, Backend, Credentials},
    error::AppError,
    models::{AuthForm, CredentialsForm},
    views,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const ACCOUNT_EXISTS: &str = "An account with this email already exists";
const SIGNUP_FAILED: &str = "Could not create account";
const UNKNOWN_ACTION: &str = "Unknown action";

/// Re-renders the landing page with a generic message. Backend error details
/// never reach this point.
fn landing_with_error(message: &str) -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type(views::HTML_CONTENT_TYPE)
        .body(views::landing(Some(message)))
}

/// Unwraps a submitted form, or logs why it could not be read (wrong content type,
/// undecodable body) and yields the landing page to answer with instead.
fn submitted<T>(
    form: Result<web::Form<T>, ActixError>,
    endpoint: &str,
    message: &str,
) -> Result<T, HttpResponse> {
    form.map(web::Form::into_inner).map_err(|e| {
        log::warn!("{} body rejected: {}", endpoint, e);
        landing_with_error(message)
    })
}

/// Stores the backend identity in the session cookie and sends the browser home.
fn start_session(sessions: &SessionConfig, session: &AuthSession) -> Result<HttpResponse, AppError> {
    let cookie = sessions.cookie(session)?;
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/home"))
        .cookie(cookie)
        .finish())
}

async fn sign_in(
    backend: &dyn Backend,
    sessions: &SessionConfig,
    form: CredentialsForm,
) -> Result<HttpResponse, AppError> {
    if let Err(e) = form.validate() {
        log::warn!("login form rejected: {}", e);
        return Ok(landing_with_error(INVALID_CREDENTIALS));
    }

    let credentials = Credentials::from(form);
    match backend.sign_in_with_password(&credentials).await {
        Ok(session) => {
            log::info!("user {} signed in", session.user.id);
            start_session(sessions, &session)
        }
        Err(e) => {
            log::warn!("login failed: {}", e);
            Ok(landing_with_error(INVALID_CREDENTIALS))
        }
    }
}

async fn register(
    backend: &dyn Backend,
    sessions: &SessionConfig,
    form: CredentialsForm,
) -> Result<HttpResponse, AppError> {
    if let Err(e) = form.validate() {
        log::warn!("signup form rejected: {}", e);
        return Ok(landing_with_error(SIGNUP_FAILED));
    }

    let credentials = Credentials::from(form);
    match backend.sign_up(&credentials).await {
        Ok(Some(session)) => {
            log::info!("user {} signed up", session.user.id);
            start_session(sessions, &session)
        }
        // No session issued: the address is already registered.
        Ok(None) | Err(AuthError::AlreadyExists) => {
            log::warn!("signup refused: account already exists");
            Ok(landing_with_error(ACCOUNT_EXISTS))
        }
        Err(e) => {
            log::warn!("signup failed: {}", e);
            Ok(landing_with_error(SIGNUP_FAILED))
        }
    }
}

/// Single form endpoint for the landing page; `action` selects login or signup.
#[post("/auth")]
pub async fn auth(
    backend: web::Data<dyn Backend>,
    sessions: web::Data<SessionConfig>,
    form: Result<web::Form<AuthForm>, ActixError>,
) -> Result<HttpResponse, AppError> {
    let form = match submitted(form, "/auth", INVALID_CREDENTIALS) {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };
    let (action, credentials) = form.into_parts();
    match action.as_str() {
        "login" => sign_in(backend.get_ref(), sessions.get_ref(), credentials).await,
        "signup" => register(backend.get_ref(), sessions.get_ref(), credentials).await,
        other => {
            log::warn!("unknown auth action {:?}", other);
            Ok(landing_with_error(UNKNOWN_ACTION))
        }
    }
}

/// Login with email and password.
///
/// ## Responses:
/// - `303 See Other` to `/home` with a fresh session cookie.
/// - `400 Bad Request`: the landing page with "Invalid credentials", whatever the cause,
///   including a body that is not a urlencoded form.
#[post("/login")]
pub async fn login(
    backend: web::Data<dyn Backend>,
    sessions: web::Data<SessionConfig>,
    form: Result<web::Form<CredentialsForm>, ActixError>,
) -> Result<HttpResponse, AppError> {
    match submitted(form, "/login", INVALID_CREDENTIALS) {
        Ok(form) => sign_in(backend.get_ref(), sessions.get_ref(), form).await,
        Err(response) => Ok(response),
    }
}

/// Register a new account.
///
/// ## Responses:
/// - `303 See Other` to `/home` with a session cookie, when the backend issued a session.
/// - `400 Bad Request`: the landing page, with a distinct message when the account exists.
#[post("/signup")]
pub async fn signup(
    backend: web::Data<dyn Backend>,
    sessions: web::Data<SessionConfig>,
    form: Result<web::Form<CredentialsForm>, ActixError>,
) -> Result<HttpResponse, AppError> {
    match submitted(form, "/signup", SIGNUP_FAILED) {
        Ok(form) => register(backend.get_ref(), sessions.get_ref(), form).await,
        Err(response) => Ok(response),
    }
}

/// Clears the session cookie, then revokes the backend session on a best-effort basis.
#[post("/logout")]
pub async fn logout(
    user: MaybeUser,
    backend: web::Data<dyn Backend>,
    sessions: web::Data<SessionConfig>,
) -> HttpResponse {
    let response = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(sessions.removal_cookie())
        .finish();

    if let Some(claims) = user.0 {
        if let Err(e) = backend.sign_out(&claims.access_token).await {
            log::warn!("remote sign-out failed, local session cleared anyway: {}", e);
        }
    }

    response
}
