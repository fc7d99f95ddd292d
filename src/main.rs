use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod attendance;
mod config;
mod db;
mod docs;
mod model;
mod routes;
mod store;
mod utils;

use attendance::{AttendanceService, SystemClock};
use config::Config;
use db::init_db;
use store::{AttendanceStore, MemoryAttendanceStore, MySqlAttendanceStore};

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Punchclock is running"
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn AttendanceStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = init_db(url).await?;
            let store = MySqlAttendanceStore::new(pool);
            store.migrate().await?;
            info!("Using MySQL attendance store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, attendance is kept in memory only");
            Ok(Arc::new(MemoryAttendanceStore::default()))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = build_store(&config).await?;
    // Built once so every worker shares the same per-employee punch locks
    let service = Data::new(AttendanceService::new(store, Arc::new(SystemClock)));

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
