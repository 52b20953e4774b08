mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod models;
mod routes;
mod service;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use db::{db::DBClient, memorydb::MemoryStore, waitlistdb::WaitlistExt};
use dotenv::dotenv;
use routes::create_router;
use service::waitlist_service::WaitlistService;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub waitlist_service: Arc<WaitlistService>,
}

impl AppState {
    pub fn new(store: Arc<dyn WaitlistExt>, config: Config) -> Self {
        let waitlist_service = Arc::new(WaitlistService::new(store, config.app_url.clone()));

        Self {
            env: config,
            waitlist_service,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::init()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let store: Arc<dyn WaitlistExt> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .context("🔥 Failed to connect to the database")?;
            tracing::info!("✅ Connection to the database is successful!");

            let db_client = DBClient::new(pool);
            db_client
                .migrate()
                .await
                .context("Failed to apply waitlist migrations")?;

            Arc::new(db_client)
        }
        None => {
            tracing::warn!("⚠️  DATABASE_URL not set - signups are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST]);

    let app_state = Arc::new(AppState::new(store, config.clone()));
    tracing::info!("🔗 Referral links point at {}", app_state.env.app_url);

    let app = create_router(app_state).layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    tracing::info!("🚀 Server is running on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
