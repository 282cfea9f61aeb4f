//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from study-core
pub use study_core::{AnswerOutcome, BatchReport, Card, CardEdit, Deck, NewCard, Question, Stage};

// === Database Entity Types ===

/// Deck stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbDeck {
    pub id: i64,
    pub name: String,
}

impl DbDeck {
    pub fn to_deck(self) -> Deck {
        Deck {
            id: self.id,
            name: self.name,
        }
    }
}

/// Card stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbCard {
    pub id: i64,
    pub deck_id: i64,
    pub question: String,
    pub answer: String,
    pub extra: Option<String>,
    pub correct: i64,
    pub incorrect: i64,
    pub lapses: i64,
    pub stage: String,
    pub ease: i64,
    pub review_due_date: DateTime<Utc>,
    pub last_review_date: Option<DateTime<Utc>>,
    pub card_created: DateTime<Utc>,
}

impl DbCard {
    /// Convert to study-core card type
    pub fn to_card(self) -> Card {
        Card {
            id: self.id,
            deck_id: self.deck_id,
            question: self.question,
            answer: self.answer,
            extra: self.extra,
            correct: to_u32(self.correct),
            incorrect: to_u32(self.incorrect),
            lapses: to_u32(self.lapses),
            stage: Stage::parse(&self.stage).unwrap_or_default(),
            ease: to_u32(self.ease).max(1),
            review_due_date: self.review_due_date,
            last_review_date: self.last_review_date,
            card_created: self.card_created,
        }
    }
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

// === API Request/Response Types ===

/// POST /api/decks request
#[derive(Debug, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
}

/// GET /api/decks response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<Deck>,
}

/// GET /api/decks/:deck_id response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckDetailResponse {
    pub deck: Deck,
    pub cards: Vec<Card>,
}

/// POST /api/decks/:deck_id/cards request
#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub extra: Option<String>,
}

impl From<CreateCardRequest> for NewCard {
    fn from(req: CreateCardRequest) -> Self {
        NewCard {
            question: req.question,
            answer: req.answer,
            extra: req.extra,
        }
    }
}

/// PUT /api/cards/:card_id request
#[derive(Debug, Deserialize)]
pub struct EditCardRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub extra: Option<String>,
}

impl From<EditCardRequest> for CardEdit {
    fn from(req: EditCardRequest) -> Self {
        CardEdit {
            question: req.question,
            answer: req.answer,
            extra: req.extra,
        }
    }
}

/// POST /api/decks/:deck_id/batch request
#[derive(Debug, Deserialize)]
pub struct BatchAddRequest {
    pub text: String,
}

/// POST /api/decks/:deck_id/batch response
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchAddResponse {
    pub cards_added_count: usize,
    pub skipped_lines: Vec<usize>,
    pub cards: Vec<Card>,
}

impl From<BatchReport> for BatchAddResponse {
    fn from(report: BatchReport) -> Self {
        Self {
            cards_added_count: report.created.len(),
            skipped_lines: report.skipped_lines,
            cards: report.created,
        }
    }
}

/// Response for DELETE endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: i64,
}

/// POST /api/cards/:card_id/{learning,review} request
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
}

/// One step of a study session
#[derive(Debug, Serialize, Deserialize)]
pub struct StudyStepResponse {
    /// No eligible card left in this queue
    pub done: bool,
    pub deck_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_card: Option<Card>,
    pub choices: Vec<Card>,
    pub remaining: usize,
}

impl StudyStepResponse {
    pub fn from_question(deck_id: i64, question: Option<Question>) -> Self {
        match question {
            Some(q) => Self {
                done: false,
                deck_id,
                next_card: Some(q.card),
                choices: q.choices,
                remaining: q.remaining,
            },
            None => Self {
                done: true,
                deck_id,
                next_card: None,
                choices: Vec::new(),
                remaining: 0,
            },
        }
    }
}

/// Answer submission response: grading result followed by the next step
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub graded: bool,
    pub correct: bool,
    pub graduated: bool,
    pub lapsed: bool,
    pub card: Card,
    #[serde(flatten)]
    pub next: StudyStepResponse,
}

impl AnswerResponse {
    pub fn new(outcome: AnswerOutcome, next: StudyStepResponse) -> Self {
        Self {
            graded: outcome.graded,
            correct: outcome.correct,
            graduated: outcome.graduated,
            lapsed: outcome.lapsed,
            card: outcome.card,
            next,
        }
    }
}
