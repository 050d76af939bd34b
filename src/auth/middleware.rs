use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::session::{SessionConfig, SESSION_COOKIE};

/// Reads the session cookie and, when it holds a valid token, inserts the
/// decoded `SessionClaims` into request extensions.
///
/// The middleware never rejects a request: an absent, expired or tampered cookie
/// simply leaves the request anonymous. Deciding what anonymous callers may do is
/// left to the `CurrentUser` extractor on each handler.
pub struct SessionMiddleware {
    config: SessionConfig,
}

impl SessionMiddleware {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service,
            config: self.config.clone(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
    config: SessionConfig,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());

        if let Some(token) = token {
            match self.config.decode(&token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                }
                Err(e) => log::debug!("ignoring invalid session cookie on {}: {}", req.path(), e),
            }
        }

        Box::pin(self.service.call(req))
    }
}
