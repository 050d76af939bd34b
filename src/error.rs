//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used by every handler.
//! It centralizes error management, providing a consistent way to handle and represent
//! the conditions that can occur, from a missing session to an unreachable backend.
//!
//! `AppError` implements `actix_web::error::ResponseError` so that handlers can return
//! `Result<HttpResponse, AppError>` and rely on `?`. Pages are HTML, so error responses
//! render the shared error page instead of JSON. Messages originating from the remote
//! backend are logged but never shown to the browser.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use std::fmt;

use crate::auth::session;
use crate::backend::BackendError;
use crate::views;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// No signed-in identity in the session. Rendered as a redirect to the landing page,
    /// never as a 401.
    Unauthenticated,
    /// The backend rejected the session's access token. The session cookie is cleared
    /// and the browser is sent to the landing page to sign in again.
    SessionExpired,
    /// A data call to the remote backend failed (HTTP 502).
    Backend(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Missing or malformed runtime configuration.
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::SessionExpired => write!(f, "Session expired"),
            AppError::Backend(msg) => write!(f, "Backend Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::SessionExpired => StatusCode::SEE_OTHER,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServerError(_) | AppError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts `AppError` variants into `HttpResponse` objects.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            AppError::Unauthenticated => {
                return HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, "/"))
                    .finish();
            }
            AppError::SessionExpired => {
                return HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, "/"))
                    .cookie(session::expired_cookie())
                    .finish();
            }
            AppError::Backend(msg) => {
                log::error!("backend call failed: {}", msg);
                "The to-do service is unavailable right now. Please try again."
            }
            AppError::InternalServerError(msg) | AppError::Configuration(msg) => {
                log::error!("internal error: {}", msg);
                "Something went wrong on our side."
            }
        };

        HttpResponse::build(status)
            .content_type(views::HTML_CONTENT_TYPE)
            .body(views::error_page(status, message))
    }
}

/// A 401 from the backend means the user's access token is no longer accepted.
impl From<BackendError> for AppError {
    fn from(error: BackendError) -> AppError {
        match error {
            BackendError::Status { status: 401, .. } => {
                log::info!("backend rejected the session token, signing out");
                AppError::SessionExpired
            }
            other => AppError::Backend(other.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InternalServerError(format!("session token error: {}", error))
    }
}
