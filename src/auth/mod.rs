pub mod extractors;
pub mod middleware;
pub mod session;

// Re-export necessary items
pub use extractors::{CurrentUser, MaybeUser};
pub use middleware::SessionMiddleware;
pub use session::{SessionClaims, SessionConfig, SESSION_COOKIE};
