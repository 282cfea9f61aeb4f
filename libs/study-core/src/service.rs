//! Study service: the scheduling engine wired to a store.
//!
//! Each method is one request's worth of work. Cards are loaded once, mutated
//! by the [`Scheduler`] and written back; a missing card is an error, never
//! a blank card.

use crate::batch::parse_batch;
use crate::error::{Result, StudyError};
use crate::grader;
use crate::sampler::{distractor_limit, sample_choices};
use crate::scheduler::Scheduler;
use crate::selector;
use crate::store::{CardStore, DeckStore, Store};
use crate::types::{Card, CardEdit, Deck, NewCard, Stage, StudyMode};
use chrono::{DateTime, Utc};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// The next card to present and its answer options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub card: Card,
    /// Shuffled options, the card itself included.
    pub choices: Vec<Card>,
    /// Eligible cards in the queue, this one included.
    pub remaining: usize,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOutcome {
    /// The card after grading.
    pub card: Card,
    /// False when the answer was blank and the card was left alone.
    pub graded: bool,
    pub correct: bool,
    pub graduated: bool,
    pub lapsed: bool,
}

/// Result of a batch import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub created: Vec<Card>,
    pub skipped_lines: Vec<usize>,
}

/// Scheduling engine bound to a store and a random source.
pub struct StudyService {
    store: Arc<dyn Store>,
    scheduler: Scheduler,
    rng: Mutex<ChaCha8Rng>,
}

impl StudyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_rng(store, ChaCha8Rng::from_entropy())
    }

    /// Deterministic shuffling, for tests.
    pub fn with_seed(store: Arc<dyn Store>, seed: u64) -> Self {
        Self::with_rng(store, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(store: Arc<dyn Store>, rng: ChaCha8Rng) -> Self {
        Self {
            store,
            scheduler: Scheduler::default(),
            rng: Mutex::new(rng),
        }
    }

    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // === Scheduling ===

    /// Apply a learning-stage grading event to a stored card.
    pub async fn update_learning(&self, card_id: i64, correct: bool, now: DateTime<Utc>) -> Result<Card> {
        let mut card = self.store.get_card(card_id).await?;
        let outcome = self.scheduler.update_learning(&mut card, correct, now);
        self.store.save_card(&card).await?;

        debug!(card_id, correct, ease = card.ease, graduated = outcome.graduated, "learning card updated");
        Ok(card)
    }

    /// Apply a review-stage grading event to a stored card.
    pub async fn update_review(&self, card_id: i64, correct: bool, now: DateTime<Utc>) -> Result<Card> {
        let mut card = self.store.get_card(card_id).await?;
        let outcome = self.scheduler.update_review(&mut card, correct, now);
        self.store.save_card(&card).await?;

        debug!(card_id, correct, ease = card.ease, lapsed = outcome.lapsed, "review card updated");
        Ok(card)
    }

    pub fn pick_most_due<'a>(&self, cards: &'a [Card]) -> Result<&'a Card> {
        selector::pick_most_due(cards)
    }

    pub fn is_correct(&self, submitted: &str, expected: &str) -> bool {
        grader::is_correct(submitted, expected)
    }

    /// Shuffled answer options for `correct`, drawn from its deck.
    pub async fn build_choice_set(&self, deck_id: i64, correct: &Card) -> Result<Vec<Card>> {
        let count = self.store.count_cards_in_deck(deck_id).await?;
        let limit = distractor_limit(count);
        let pool = if limit == 0 {
            Vec::new()
        } else {
            let seed = self.lock_rng().next_u64();
            self.store
                .sample_cards_excluding(deck_id, correct.id, limit, seed)
                .await?
        };

        Ok(sample_choices(count, correct.clone(), pool, &mut *self.lock_rng()))
    }

    fn lock_rng(&self) -> MutexGuard<'_, ChaCha8Rng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Session flow ===

    /// The most due eligible card of the deck, or `None` when the queue is empty.
    pub async fn next_question(
        &self,
        deck_id: i64,
        mode: StudyMode,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>> {
        self.store.get_deck(deck_id).await?;

        let candidates = match mode {
            StudyMode::Learning => {
                self.store
                    .cards_by_deck_and_stage(deck_id, Stage::Learning)
                    .await?
            }
            StudyMode::Review => self.store.due_review_cards(deck_id, now).await?,
        };
        if candidates.is_empty() {
            debug!(deck_id, ?mode, "queue empty");
            return Ok(None);
        }

        let card = selector::pick_most_due(&candidates)?.clone();
        let choices = self.build_choice_set(deck_id, &card).await?;

        Ok(Some(Question {
            card,
            choices,
            remaining: candidates.len(),
        }))
    }

    /// Grade `answer` against the card and reschedule it.
    ///
    /// The scheduler entry point follows the card's current stage. A blank
    /// answer is not graded.
    pub async fn submit_answer(&self, card_id: i64, answer: &str, now: DateTime<Utc>) -> Result<AnswerOutcome> {
        let mut card = self.store.get_card(card_id).await?;

        if answer.trim().is_empty() {
            return Ok(AnswerOutcome {
                card,
                graded: false,
                correct: false,
                graduated: false,
                lapsed: false,
            });
        }

        let correct = grader::is_correct(answer, &card.answer);
        let grade = self.scheduler.grade(&mut card, correct, now);
        self.store.save_card(&card).await?;

        debug!(
            card_id,
            correct,
            stage = card.stage.as_str(),
            ease = card.ease,
            due = %card.review_due_date,
            "answer graded"
        );
        if grade.graduated {
            info!(card_id, "card graduated to review");
        }

        Ok(AnswerOutcome {
            card,
            graded: true,
            correct,
            graduated: grade.graduated,
            lapsed: grade.lapsed,
        })
    }

    // === Decks and cards ===

    pub async fn create_deck(&self, name: &str) -> Result<Deck> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudyError::InvalidInput("deck name cannot be empty".into()));
        }
        let deck = self.store.create_deck(name).await?;
        info!(deck_id = deck.id, name = %deck.name, "deck created");
        Ok(deck)
    }

    pub async fn list_decks(&self) -> Result<Vec<Deck>> {
        self.store.list_decks().await
    }

    pub async fn delete_deck(&self, deck_id: i64) -> Result<()> {
        self.store.delete_deck(deck_id).await?;
        info!(deck_id, "deck deleted");
        Ok(())
    }

    /// An existing deck together with its cards.
    pub async fn deck_cards(&self, deck_id: i64) -> Result<(Deck, Vec<Card>)> {
        let deck = self.store.get_deck(deck_id).await?;
        let cards = self.store.cards_in_deck(deck_id).await?;
        Ok((deck, cards))
    }

    pub async fn create_card(&self, deck_id: i64, card: NewCard, now: DateTime<Utc>) -> Result<Card> {
        let card = clean_new_card(card)?;
        self.store.create_card(deck_id, card, now).await
    }

    /// Replace a card's text. Scheduling state is kept.
    pub async fn edit_card(&self, card_id: i64, edit: CardEdit) -> Result<Card> {
        let fields = clean_new_card(NewCard {
            question: edit.question,
            answer: edit.answer,
            extra: edit.extra,
        })?;

        let mut card = self.store.get_card(card_id).await?;
        card.question = fields.question;
        card.answer = fields.answer;
        card.extra = fields.extra;
        self.store.save_card(&card).await?;
        Ok(card)
    }

    pub async fn delete_card(&self, card_id: i64) -> Result<()> {
        self.store.delete_card(card_id).await
    }

    /// Import `question;answer` lines into a deck.
    pub async fn batch_add(&self, deck_id: i64, text: &str, now: DateTime<Utc>) -> Result<BatchReport> {
        self.store.get_deck(deck_id).await?;

        let parsed = parse_batch(text);
        let mut created = Vec::with_capacity(parsed.cards.len());
        for card in parsed.cards {
            created.push(self.store.create_card(deck_id, card, now).await?);
        }

        info!(deck_id, created = created.len(), skipped = parsed.skipped_lines.len(), "batch imported");
        Ok(BatchReport {
            created,
            skipped_lines: parsed.skipped_lines,
        })
    }
}

fn clean_new_card(card: NewCard) -> Result<NewCard> {
    let question = card.question.trim();
    let answer = card.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(StudyError::InvalidInput("question or answer cannot be empty".into()));
    }

    let extra = card
        .extra
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);

    Ok(NewCard {
        question: question.to_string(),
        answer: answer.to_string(),
        extra,
    })
}
