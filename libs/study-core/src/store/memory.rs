//! In-process store.

use super::{CardStore, DeckStore};
use crate::error::{Result, StudyError};
use crate::types::{Card, Deck, NewCard, Stage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("memory store lock poisoned")]
struct LockPoisoned;

#[derive(Debug, Default)]
struct Inner {
    last_deck_id: i64,
    last_card_id: i64,
    decks: BTreeMap<i64, Deck>,
    cards: BTreeMap<i64, Card>,
}

impl Inner {
    fn deck_cards(&self, deck_id: i64) -> impl Iterator<Item = &Card> {
        self.cards.values().filter(move |c| c.deck_id == deck_id)
    }

    fn ensure_deck(&self, deck_id: i64) -> Result<()> {
        if self.decks.contains_key(&deck_id) {
            Ok(())
        } else {
            Err(StudyError::deck_not_found(deck_id))
        }
    }
}

/// Store keeping decks and cards in memory, with sequential ids from 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StudyError::store(LockPoisoned))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StudyError::store(LockPoisoned))
    }
}

#[async_trait]
impl DeckStore for MemoryStore {
    async fn create_deck(&self, name: &str) -> Result<Deck> {
        let mut inner = self.write()?;
        inner.last_deck_id += 1;
        let deck = Deck {
            id: inner.last_deck_id,
            name: name.to_string(),
        };
        inner.decks.insert(deck.id, deck.clone());
        Ok(deck)
    }

    async fn get_deck(&self, id: i64) -> Result<Deck> {
        self.read()?
            .decks
            .get(&id)
            .cloned()
            .ok_or_else(|| StudyError::deck_not_found(id))
    }

    async fn list_decks(&self) -> Result<Vec<Deck>> {
        Ok(self.read()?.decks.values().cloned().collect())
    }

    async fn delete_deck(&self, id: i64) -> Result<()> {
        let mut inner = self.write()?;
        inner
            .decks
            .remove(&id)
            .ok_or_else(|| StudyError::deck_not_found(id))?;
        inner.cards.retain(|_, card| card.deck_id != id);
        Ok(())
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn create_card(&self, deck_id: i64, card: NewCard, now: DateTime<Utc>) -> Result<Card> {
        let mut inner = self.write()?;
        inner.ensure_deck(deck_id)?;
        inner.last_card_id += 1;
        let card = Card::new(inner.last_card_id, deck_id, card, now);
        inner.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn get_card(&self, id: i64) -> Result<Card> {
        self.read()?
            .cards
            .get(&id)
            .cloned()
            .ok_or_else(|| StudyError::card_not_found(id))
    }

    async fn cards_in_deck(&self, deck_id: i64) -> Result<Vec<Card>> {
        Ok(self.read()?.deck_cards(deck_id).cloned().collect())
    }

    async fn cards_by_deck_and_stage(&self, deck_id: i64, stage: Stage) -> Result<Vec<Card>> {
        Ok(self
            .read()?
            .deck_cards(deck_id)
            .filter(|c| c.stage == stage)
            .cloned()
            .collect())
    }

    async fn due_review_cards(&self, deck_id: i64, now: DateTime<Utc>) -> Result<Vec<Card>> {
        Ok(self
            .read()?
            .deck_cards(deck_id)
            .filter(|c| c.stage == Stage::Review && c.review_due_date <= now)
            .cloned()
            .collect())
    }

    async fn count_cards_in_deck(&self, deck_id: i64) -> Result<usize> {
        Ok(self.read()?.deck_cards(deck_id).count())
    }

    async fn sample_cards_excluding(
        &self,
        deck_id: i64,
        exclude_id: i64,
        limit: usize,
        seed: u64,
    ) -> Result<Vec<Card>> {
        let inner = self.read()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let candidates = inner.deck_cards(deck_id).filter(|c| c.id != exclude_id);
        Ok(candidates
            .choose_multiple(&mut rng, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn save_card(&self, card: &Card) -> Result<()> {
        let mut inner = self.write()?;
        match inner.cards.get_mut(&card.id) {
            Some(stored) => {
                *stored = card.clone();
                Ok(())
            }
            None => Err(StudyError::card_not_found(card.id)),
        }
    }

    async fn delete_card(&self, id: i64) -> Result<()> {
        self.write()?
            .cards
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StudyError::card_not_found(id))
    }
}
