mod api;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod state;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::services::notification_service::{HttpMailGateway, LogGateway, NotificationGateway};
use crate::services::token_service::TokenService;
use crate::state::AppState;

fn startup_error<E: std::fmt::Display>(context: &str, err: E) -> std::io::Error {
    std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    log::info!("🚀 Starting Planetary API...");

    let tokens = TokenService::new(
        &config.jwt_secret,
        &config.jwt_issuer,
        config.token_ttl_hours.map(chrono::Duration::hours),
    );
    match config.token_ttl_hours {
        Some(hours) => log::info!("🔑 Tokens expire after {}h", hours),
        None => log::info!("🔑 Tokens never expire"),
    }

    let notifier: Arc<dyn NotificationGateway> = match &config.mail {
        Some(mail) => {
            log::info!("📧 Mail relay: {}", mail.api_url);
            let gateway = HttpMailGateway::new(&mail.api_url, &mail.api_key, &mail.sender)
                .map_err(|e| startup_error("Failed to build mail client", e))?;
            Arc::new(gateway)
        }
        None => {
            log::warn!("⚠️  MAIL_API_URL/MAIL_API_KEY not set, recovery emails are written to the log");
            Arc::new(LogGateway)
        }
    };

    let state = match &config.database_url {
        Some(url) => {
            let db = database::MongoDB::new(url)
                .await
                .map_err(|e| startup_error("Failed to connect to MongoDB", e))?;
            log::info!("✅ MongoDB connected successfully");
            AppState::with_mongo(db, tokens, notifier, config.bcrypt_cost)
        }
        None => {
            log::warn!("⚠️  DATABASE_URL not set, using the in-memory store (data is lost on exit)");
            AppState::in_memory(tokens, notifier, config.bcrypt_cost)
        }
    };

    if config.seed_demo_data {
        seeds::planets_seed::seed_demo_data(&state)
            .await
            .map_err(|e| startup_error("Failed to seed demo data", e))?;
    }

    let state = web::Data::new(state);
    let allowed_origins = config.allowed_origins.clone();

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", api::swagger::ApiDoc::openapi()))
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
