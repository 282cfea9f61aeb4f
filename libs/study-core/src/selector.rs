//! Picks the next card to present.

use crate::error::{Result, StudyError};
use crate::types::Card;

/// Card with the earliest due date; the first one wins on ties.
pub fn pick_most_due(cards: &[Card]) -> Result<&Card> {
    let (first, rest) = cards.split_first().ok_or(StudyError::EmptyInput)?;

    let mut most_due = first;
    for card in rest {
        if card.review_due_date < most_due.review_due_date {
            most_due = card;
        }
    }

    Ok(most_due)
}
