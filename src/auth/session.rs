//! Signed session cookie.
//!
//! The browser holds the whole session: an HS256 token signed with `SECRET_KEY`
//! carrying the signed-in identity. Nothing is stored server-side, so clearing the
//! cookie is all it takes to return to the anonymous state.

use actix_web::cookie::{time, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::AuthSession;
use crate::config::Config;
use crate::error::AppError;

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "session";

/// Session lifetime bounds, in hours (one hour to one year).
pub const MIN_SESSION_TTL_HOURS: i64 = 1;
pub const MAX_SESSION_TTL_HOURS: i64 = 8760;

/// Represents the claims encoded within the session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// The backend's identity token for the signed-in user (`user_id`).
    pub sub: Uuid,
    /// `user_email`; empty when the backend did not report one.
    pub email: String,
    /// Backend access token: the bearer on data calls and the session revoked on logout.
    pub access_token: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

impl SessionClaims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Keys and cookie policy for issuing and reading sessions.
#[derive(Clone)]
pub struct SessionConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: i64,
    secure: bool,
}

impl SessionConfig {
    /// `ttl_hours` is clamped to `MIN_SESSION_TTL_HOURS..=MAX_SESSION_TTL_HOURS`.
    pub fn new(secret: &str, ttl_hours: i64, secure: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours: ttl_hours.clamp(MIN_SESSION_TTL_HOURS, MAX_SESSION_TTL_HOURS),
            secure,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.secret_key,
            config.session_ttl_hours,
            config.secure_cookies,
        )
    }

    /// Builds the claims for a freshly signed-in backend session.
    pub fn claims_for(&self, session: &AuthSession) -> SessionClaims {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.ttl_hours);
        SessionClaims {
            sub: session.user.id,
            email: session.user.email.clone().unwrap_or_default(),
            access_token: session.access_token.clone(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        }
    }

    pub fn encode(&self, claims: &SessionClaims) -> Result<String, AppError> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Verifies the signature and expiry of a session token.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
    }

    /// The `Set-Cookie` that signs the browser in.
    pub fn cookie(&self, session: &AuthSession) -> Result<Cookie<'static>, AppError> {
        let token = self.encode(&self.claims_for(session))?;
        Ok(Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::hours(self.ttl_hours))
            .finish())
    }

    /// The `Set-Cookie` that clears the session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = expired_cookie();
        cookie.set_secure(self.secure);
        cookie
    }
}

/// An already-expired session cookie, for responses built without a `SessionConfig`.
pub fn expired_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AuthUser;

    fn auth_session() -> AuthSession {
        AuthSession {
            access_token: "backend-jwt".to_string(),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: Some("ada@example.com".to_string()),
            },
        }
    }

    #[test]
    fn test_session_token_carries_identity() {
        let config = SessionConfig::new("test_secret", 24, false);
        let session = auth_session();

        let token = config.encode(&config.claims_for(&session)).unwrap();
        let claims = config.decode(&token).unwrap();

        assert_eq!(claims.user_id(), session.user.id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.access_token, "backend-jwt");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_session_token_signed_with_other_secret_is_rejected() {
        let issuer = SessionConfig::new("one_secret", 24, false);
        let reader = SessionConfig::new("a_completely_different_secret", 24, false);

        let token = issuer.encode(&issuer.claims_for(&auth_session())).unwrap();
        assert!(reader.decode(&token).is_err());
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let config = SessionConfig::new("test_secret", 24, false);
        let mut claims = config.claims_for(&auth_session());
        let two_hours_ago = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        claims.exp = two_hours_ago;
        claims.iat = two_hours_ago;

        let token = config.encode(&claims).unwrap();
        assert!(config.decode(&token).is_err());
    }

    #[test]
    fn test_out_of_range_ttl_is_clamped() {
        let session = auth_session();

        let huge = SessionConfig::new("test_secret", 10_000_000_000_000_000, false);
        let claims = huge.claims_for(&session);
        assert_eq!(claims.exp - claims.iat, (MAX_SESSION_TTL_HOURS * 3600) as usize);

        let negative = SessionConfig::new("test_secret", -5, false);
        let claims = negative.claims_for(&session);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_cookies() {
        let config = SessionConfig::new("test_secret", 24, true);

        let cookie = config.cookie(&auth_session()).unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));

        let removal = config.removal_cookie();
        assert_eq!(removal.value(), "");
        assert_eq!(removal.secure(), Some(true));
        assert_eq!(removal.max_age(), Some(time::Duration::ZERO));
    }
}
