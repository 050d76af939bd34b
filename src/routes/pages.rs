use actix_web::{get, HttpResponse, Responder};

use crate::views;

/// Landing page with the login/signup form. Never requires a session.
#[get("/")]
pub async fn landing() -> impl Responder {
    HttpResponse::Ok()
        .content_type(views::HTML_CONTENT_TYPE)
        .body(views::landing(None))
}

#[get("/about")]
pub async fn about() -> impl Responder {
    HttpResponse::Ok()
        .content_type(views::HTML_CONTENT_TYPE)
        .body(views::about())
}
