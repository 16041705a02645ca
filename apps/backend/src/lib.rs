pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::db::SqliteStore;
use crate::models::StudySession;
use crate::services::CardGenerator;

/// A study session held in memory, with the deck it draws from.
pub struct ActiveSession {
    pub deck_id: Uuid,
    pub session: StudySession,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SqliteStore>>,
    pub sessions: Arc<Mutex<HashMap<Uuid, ActiveSession>>>,
    pub generator: Arc<CardGenerator>,
}

impl AppState {
    pub fn new(store: SqliteStore, generator: CardGenerator) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            generator: Arc::new(generator),
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Deck routes
        .route("/api/decks", get(routes::decks::list))
        .route("/api/decks", post(routes::decks::create))
        .route("/api/decks/:id", get(routes::decks::detail))
        .route("/api/decks/:id", put(routes::decks::update))
        .route("/api/decks/:id", delete(routes::decks::remove))
        .route("/api/decks/:id/cards", post(routes::decks::add_card))
        .route(
            "/api/decks/:id/cards/:card_id",
            put(routes::decks::edit_card),
        )
        .route(
            "/api/decks/:id/cards/:card_id",
            delete(routes::decks::delete_card),
        )
        .route(
            "/api/decks/:id/generate",
            post(routes::generate::generate_cards),
        )
        // Trash routes
        .route("/api/trash", get(routes::trash::list))
        .route("/api/trash/:card_id/restore", post(routes::trash::restore))
        .route("/api/trash/:card_id", delete(routes::trash::purge))
        // Study routes
        .route("/api/study/session", post(routes::study::start))
        .route("/api/study/session/:id", get(routes::study::view))
        .route("/api/study/session/:id", delete(routes::study::finish))
        .route("/api/study/session/:id/reveal", post(routes::study::reveal))
        .route("/api/study/session/:id/rate", post(routes::study::rate))
        .route("/api/study/session/:id/done", post(routes::study::done))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_path = resolve_db_path()?;
    tracing::info!("Opening store at {}", db_path.display());
    let store = SqliteStore::open(&db_path)?;

    if let Some(deck) = store.seed_demo_deck(chrono::Utc::now())? {
        tracing::info!("Seeded starter deck \"{}\"", deck.name);
    }

    let state = AppState::new(store, CardGenerator::from_env());

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Database location: MNEMO_DB_PATH, or the platform data directory.
fn resolve_db_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var("MNEMO_DB_PATH") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        return Ok(path);
    }

    let base = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("could not determine a data directory"))?;
    let dir = base.join("mnemo");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("mnemo.db"))
}

async fn health_check() -> &'static str {
    "OK"
}
