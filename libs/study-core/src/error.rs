//! Error types for study-core.

use thiserror::Error;

/// Result type alias using StudyError.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Errors surfaced by the scheduling engine and the card store.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("no candidate cards to choose from")]
    EmptyInput,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StudyError {
    pub fn deck_not_found(id: i64) -> Self {
        Self::NotFound { entity: "deck", id }
    }

    pub fn card_not_found(id: i64) -> Self {
        Self::NotFound { entity: "card", id }
    }

    /// Wrap an opaque persistence failure.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
