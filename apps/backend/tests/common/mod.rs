//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the API over a store
//! - Helper functions for creating test data
//!
//! # Requirements
//! Most tests run against the in-memory store. Tests built with
//! `TestContext::with_postgres` need a PostgreSQL database (set DATABASE_URL).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use chrono::{Duration, Utc};

use study_backend::db::PgStore;
use study_backend::models::{Card, Deck, NewCard, Stage};
use study_backend::{app, AppState};
use study_core::{CardStore, MemoryStore, Store, StudyService};

/// Test context holding the service and the router built on it.
pub struct TestContext {
    pub service: Arc<StudyService>,
    app: Router,
}

impl TestContext {
    /// Create a context over a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Create a context over PostgreSQL.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn with_postgres() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = PgStore::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self::with_store(Arc::new(db))
    }

    fn with_store(store: Arc<dyn Store>) -> Self {
        let state = AppState::new(StudyService::with_seed(store, 2024));
        let service = state.service.clone();
        let app = app(state);
        Self { service, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    /// Create a deck holding `num_cards` generated cards.
    pub async fn create_deck_with_cards(&self, name: &str, num_cards: usize) -> (Deck, Vec<Card>) {
        let deck = self
            .service
            .create_deck(name)
            .await
            .expect("Failed to create test deck");

        let mut cards = Vec::with_capacity(num_cards);
        for i in 1..=num_cards {
            let card = self
                .service
                .create_card(
                    deck.id,
                    NewCard::new(format!("Question {i}?"), format!("Answer {i}")),
                    Utc::now(),
                )
                .await
                .expect("Failed to create test card");
            cards.push(card);
        }

        (deck, cards)
    }

    /// Move a card to the review stage with the given ease, due `ago` in the past.
    pub async fn make_due_review(&self, card_id: i64, ease: u32, ago: Duration) -> Card {
        let store = self.service.store();
        let mut card = store.get_card(card_id).await.expect("card exists");
        card.stage = Stage::Review;
        card.ease = ease;
        card.review_due_date = Utc::now() - ago;
        store.save_card(&card).await.expect("Failed to save card");
        card
    }

    /// Remove a deck and its cards.
    pub async fn cleanup_deck(&self, deck_id: i64) {
        let _ = self.service.delete_deck(deck_id).await;
    }
}
