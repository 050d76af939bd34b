use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::auth::session::{MAX_SESSION_TTL_HOURS, MIN_SESSION_TTL_HOURS};
use crate::error::AppError;

const FALLBACK_SECRET_KEY: &str = "fallback-secret-key";

/// Runtime settings, read from the process environment (and `.env` via `dotenv`).
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_key: String,
    pub secret_key: String,
    pub server_port: u16,
    pub server_host: String,
    pub session_ttl_hours: i64,
    pub backend_timeout_secs: u64,
    /// When set, `/delete/{id}` requires a session and only removes the caller's own rows.
    pub enforce_delete_ownership: bool,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            log::warn!("SECRET_KEY is not set, sessions are signed with the fallback key");
            FALLBACK_SECRET_KEY.to_string()
        });

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            supabase_key: required("SUPABASE_KEY")?,
            secret_key,
            server_port: parsed("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            session_ttl_hours: bounded(
                "SESSION_TTL_HOURS",
                parsed("SESSION_TTL_HOURS", 24)?,
                MIN_SESSION_TTL_HOURS..=MAX_SESSION_TTL_HOURS,
            )?,
            backend_timeout_secs: parsed("BACKEND_TIMEOUT_SECS", 10)?,
            enforce_delete_ownership: parsed("ENFORCE_DELETE_OWNERSHIP", true)?,
            secure_cookies: parsed("SECURE_COOKIES", false)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Configuration(format!("{} must be set", name)))
}

fn parsed<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

fn bounded<T>(name: &str, value: T, range: RangeInclusive<T>) -> Result<T, AppError>
where
    T: PartialOrd + fmt::Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(AppError::Configuration(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}
