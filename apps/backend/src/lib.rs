pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use study_core::{MemoryStore, Store, StudyService};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::PgStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StudyService>,
}

impl AppState {
    pub fn new(service: StudyService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the API router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Deck routes
        .route("/api/decks", get(routes::decks::list).post(routes::decks::create))
        .route(
            "/api/decks/:deck_id",
            get(routes::decks::get).delete(routes::decks::delete),
        )
        .route("/api/decks/:deck_id/cards", post(routes::cards::create))
        .route("/api/decks/:deck_id/batch", post(routes::decks::batch_add))
        // Card routes
        .route(
            "/api/cards/:card_id",
            put(routes::cards::edit).delete(routes::cards::delete),
        )
        // Study routes
        .route("/api/decks/:deck_id/learning", get(routes::study::learning_queue))
        .route("/api/cards/:card_id/learning", post(routes::study::answer_learning))
        .route("/api/decks/:deck_id/review", get(routes::study::review_queue))
        .route("/api/cards/:card_id/review", post(routes::study::answer_review))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let db = PgStore::connect(database_url, config.database_max_connections).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;
            Arc::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, cards are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(StudyService::new(store));
    let app = app(state);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
