use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;

use tallylist::auth::{SessionConfig, SessionMiddleware};
use tallylist::backend::{Backend, SupabaseClient};
use tallylist::config::Config;
use tallylist::routes::{self, DeletePolicy};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let client = SupabaseClient::new(
        config.supabase_url.as_str(),
        config.supabase_key.as_str(),
        Duration::from_secs(config.backend_timeout_secs),
    )
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let backend: web::Data<dyn Backend> = web::Data::from(Arc::new(client) as Arc<dyn Backend>);

    let sessions = SessionConfig::from_config(&config);
    let delete_policy = DeletePolicy::from_config(&config);
    if delete_policy == DeletePolicy::Unrestricted {
        log::warn!("ENFORCE_DELETE_OWNERSHIP is off: anyone can delete any todo by id");
    }

    log::info!("Starting Tallylist server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(backend.clone())
            .app_data(web::Data::new(sessions.clone()))
            .app_data(web::Data::new(delete_policy))
            .wrap(SessionMiddleware::new(sessions.clone()))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
