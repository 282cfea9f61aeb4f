//! Persistence port for decks and cards.
//!
//! The scheduling engine only talks to storage through these traits. The
//! backend provides a PostgreSQL implementation; [`MemoryStore`] keeps
//! everything in process.

mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::{Card, Deck, NewCard, Stage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository for deck operations.
#[async_trait]
pub trait DeckStore: Send + Sync {
    async fn create_deck(&self, name: &str) -> Result<Deck>;
    async fn get_deck(&self, id: i64) -> Result<Deck>;
    /// All decks, ordered by id.
    async fn list_decks(&self) -> Result<Vec<Deck>>;
    /// Removes the deck and every card in it.
    async fn delete_deck(&self, id: i64) -> Result<()>;
}

/// Repository for card operations.
///
/// Every list comes back ordered by card id.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn create_card(&self, deck_id: i64, card: NewCard, now: DateTime<Utc>) -> Result<Card>;
    async fn get_card(&self, id: i64) -> Result<Card>;
    async fn cards_in_deck(&self, deck_id: i64) -> Result<Vec<Card>>;
    async fn cards_by_deck_and_stage(&self, deck_id: i64, stage: Stage) -> Result<Vec<Card>>;
    /// Review-stage cards with `review_due_date <= now`.
    async fn due_review_cards(&self, deck_id: i64, now: DateTime<Utc>) -> Result<Vec<Card>>;
    async fn count_cards_in_deck(&self, deck_id: i64) -> Result<usize>;
    /// Up to `limit` distinct cards of the deck, drawn at random, never `exclude_id`.
    ///
    /// The draw is a function of `seed`: the same seed over the same deck
    /// picks the same cards.
    async fn sample_cards_excluding(
        &self,
        deck_id: i64,
        exclude_id: i64,
        limit: usize,
        seed: u64,
    ) -> Result<Vec<Card>>;
    /// Overwrite a stored card. Fails with NotFound if it was deleted.
    async fn save_card(&self, card: &Card) -> Result<()>;
    async fn delete_card(&self, id: i64) -> Result<()>;
}

/// Everything the study service needs from storage.
pub trait Store: DeckStore + CardStore {}

impl<T: DeckStore + CardStore> Store for T {}
