//! Flashcard Study Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod generator;
pub mod models;
pub mod routes;
pub mod security;
pub mod streak;
pub mod sync;

pub use config::Config;
pub use db::{open_database, Db, Store};
pub use error::{AppError, Result};

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use generator::ContentGenerator;
use sync::Synchronizer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub generator: Arc<dyn ContentGenerator>,
}

impl AppState {
    /// Create a new AppState with the given database, configuration and generator
    pub fn new(db: Db, config: Config, generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            store: Store::new(db),
            config,
            generator,
        }
    }

    /// Set synchronizer bound to this state's store and generator
    pub fn synchronizer(&self) -> Synchronizer {
        Synchronizer::new(self.store.clone(), self.generator.clone())
    }
}

/// Build the API router (without CORS/tracing layers)
pub fn app(state: AppState) -> Router {
    use routes::*;

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register_user))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/details", put(update_details))
        .route("/api/auth/password", put(update_password))
        .route("/api/auth/streak", get(get_streak))
        .route("/api/auth/account", delete(delete_account))
        .route("/api/flashcards/stats", get(get_stats))
        .route("/api/flashcards/sets", post(create_set).get(list_sets))
        .route(
            "/api/flashcards/sets/:id",
            get(get_set).put(update_set).delete(delete_set),
        )
        .route("/api/flashcards/sets/:id/cards", post(add_card))
        .route("/api/flashcards/sets/:id/cards/:card_id", delete(delete_card))
        .route("/api/flashcards/due", get(due_cards))
        .route("/api/flashcards/:id/status", put(update_card_status))
        .with_state(state)
}
