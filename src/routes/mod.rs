pub mod auth;
pub mod pages;
pub mod todos;

use actix_web::{http::header, web, HttpResponse};

pub use todos::DeletePolicy;

/// Registers every page and form handler.
///
/// Handlers expect `web::Data<dyn Backend>`, `web::Data<SessionConfig>` and
/// `web::Data<DeletePolicy>` in app data, and `SessionMiddleware` wrapping the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::landing)
        .service(pages::about)
        .service(todos::list_todos)
        .service(todos::add_todo)
        .service(todos::toggle_todo)
        .service(todos::delete_todo)
        .service(auth::auth)
        .service(auth::login)
        .service(auth::signup)
        .service(auth::logout);
}

/// `303 See Other`, so a browser follows a form POST with a GET.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
