//! Core types for the study engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse scheduling phase of a card.
///
/// Cards only ever move from `Learning` to `Review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Learning,
    Review,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Learning
    }
}

impl Stage {
    /// Get the stage name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Review => "review",
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "learning" => Some(Self::Learning),
            "review" => Some(Self::Review),
            _ => None,
        }
    }
}

/// Which queue a study session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    /// Every learning-stage card is eligible, regardless of due date.
    Learning,
    /// Review-stage cards whose due date has passed.
    Review,
}

/// A named collection of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
}

/// A question/answer study unit with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub deck_id: i64,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    pub correct: u32,
    pub incorrect: u32,
    pub lapses: u32,
    pub stage: Stage,
    pub ease: u32,
    pub review_due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    pub card_created: DateTime<Utc>,
}

impl Card {
    /// Fresh card: learning stage, ease 1, due immediately.
    pub fn new(id: i64, deck_id: i64, fields: NewCard, now: DateTime<Utc>) -> Self {
        Self {
            id,
            deck_id,
            question: fields.question,
            answer: fields.answer,
            extra: fields.extra,
            correct: 0,
            incorrect: 0,
            lapses: 0,
            stage: Stage::Learning,
            ease: 1,
            review_due_date: now,
            last_review_date: None,
            card_created: now,
        }
    }

    /// Whether the card can be presented in the given mode at `now`.
    pub fn is_eligible(&self, mode: StudyMode, now: DateTime<Utc>) -> bool {
        match mode {
            StudyMode::Learning => self.stage == Stage::Learning,
            StudyMode::Review => self.stage == Stage::Review && self.review_due_date <= now,
        }
    }
}

/// User-supplied fields of a card about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl NewCard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            extra: None,
        }
    }
}

/// Direct edit of a card's text. Scheduling state is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEdit {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub extra: Option<String>,
}
