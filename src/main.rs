use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, http::header::ContentType};

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod store;
mod utils;

use config::Config;
use db::init_store;
use routes::RateLimits;

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

const INDEX_HTML: &str = include_str!("../static/index.html");
const FORM_SCRIPT: &str = include_str!("../static/script.js");

/// Registration form
#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

#[get("/static/script.js")]
async fn form_script() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(FORM_SCRIPT)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "attendance.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(backend = %config.store_backend, "Server starting...");

    let ledger = init_store(&config).await;
    if !ledger.is_available() {
        warn!("Record store unavailable, /register and /attendance will answer 500");
    }

    let limits = RateLimits::from_config(&config);
    let server_addr = config.server_addr.clone();
    info!("Binding to {server_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(ledger.clone()))
            .service(index)
            .service(form_script)
            .configure(|cfg| routes::configure(cfg, &limits))
    })
    .bind(server_addr)?
    .run()
    .await
}
