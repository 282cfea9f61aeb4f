//! Multiple-choice option assembly.

use crate::types::Card;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Most distractors shown next to the correct answer.
pub const MAX_DISTRACTORS: usize = 5;

/// Number of distractors to draw for a deck holding `deck_card_count` cards,
/// the correct one included.
pub fn distractor_limit(deck_card_count: usize) -> usize {
    match deck_card_count {
        0 | 1 => 0,
        n if n < MAX_DISTRACTORS => n - 1,
        _ => MAX_DISTRACTORS,
    }
}

/// Draw distractors from `pool` and shuffle them together with `correct`.
///
/// Cards in `pool` sharing the correct card's id, and repeated ids, are never
/// drawn. The result holds the correct card exactly once.
pub fn sample_choices<R: Rng + ?Sized>(
    deck_card_count: usize,
    correct: Card,
    pool: Vec<Card>,
    rng: &mut R,
) -> Vec<Card> {
    let limit = distractor_limit(deck_card_count);

    let mut seen = HashSet::from([correct.id]);
    let candidates: Vec<Card> = pool
        .into_iter()
        .filter(|card| seen.insert(card.id))
        .collect();

    let mut choices: Vec<Card> = candidates
        .choose_multiple(rng, limit)
        .cloned()
        .collect();
    choices.push(correct);
    choices.shuffle(rng);

    choices
}
