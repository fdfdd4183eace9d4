use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod leave;
mod model;
mod models;
mod notify;
mod routes;
mod store;
#[cfg(test)]
mod testing;

use auth::gate::AuthGate;
use config::Config;
use db::init_store;
use leave::{BlockedDateRegistry, RequestIntake, RequestQuery};
use notify::relay::RelayNotifier;
use routes::RateLimiters;

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = init_store(&config.database_url).await?;

    // Shared across workers: one registry, one notifier, one set of limiters
    let gate = Data::new(AuthGate::new(&config.admin, &config.jwt_secret)?);
    let registry = BlockedDateRegistry::new(store.clone());
    let notifier = Arc::new(RelayNotifier::new(&config.relay));
    let intake = Data::new(RequestIntake::new(store.clone(), registry.clone(), notifier));
    let query = Data::new(RequestQuery::new(store.clone()));
    let registry = Data::new(registry);
    let limiters = RateLimiters::from_config(&config)?;

    let cors_origins = config.cors_allowed_origins.clone();
    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .wrap(routes::cors(&cors_origins))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(gate.clone())
            .app_data(intake.clone())
            .app_data(query.clone())
            .app_data(registry.clone())
            .configure(|cfg| routes::configure(cfg, &limiters))
    })
    .bind(server_addr)?
    .run()
    .await?;

    store.close().await;
    info!("Server stopped");
    Ok(())
}
