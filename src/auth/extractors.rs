use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::session::SessionClaims;
use crate::error::AppError;

/// The session guard: the signed-in identity, or a redirect to the landing page.
///
/// Handlers that touch per-user data take this extractor. When `SessionMiddleware`
/// found no valid session, extraction fails with `AppError::Unauthenticated`, which
/// renders as `303 See Other` to `/` before the handler body (and any backend call)
/// runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionClaims);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.user_id()
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// The backend access token issued at sign-in, sent as the bearer on data calls.
    pub fn access_token(&self) -> &str {
        &self.0.access_token
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<SessionClaims>().cloned() {
            Some(claims) => ready(Ok(CurrentUser(claims))),
            None => ready(Err(AppError::Unauthenticated.into())),
        }
    }
}

/// The signed-in identity if there is one. Never fails.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionClaims>);

impl FromRequest for MaybeUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(req.extensions().get::<SessionClaims>().cloned())))
    }
}
