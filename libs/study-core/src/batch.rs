//! Plain-text batch import.
//!
//! # Format
//! ```text
//! What is the capital of France?;Paris
//! 2 + 2;4
//! ```
//!
//! One card per line, question and answer separated by a single `;`.

use crate::types::NewCard;
use serde::{Deserialize, Serialize};

/// Separator between question and answer.
pub const SEPARATOR: char = ';';

/// Cards parsed from a batch, plus the lines that could not be used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBatch {
    pub cards: Vec<NewCard>,
    /// 1-based line numbers.
    pub skipped_lines: Vec<usize>,
}

/// Parse batch text into new cards.
///
/// Blank lines are ignored. Lines without exactly one separator, or with an
/// empty question or answer, are skipped.
pub fn parse_batch(content: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line) {
            Some(card) => batch.cards.push(card),
            None => batch.skipped_lines.push(idx + 1),
        }
    }

    batch
}

fn parse_line(line: &str) -> Option<NewCard> {
    let mut parts = line.split(SEPARATOR);
    let question = parts.next()?.trim();
    let answer = parts.next()?.trim();
    if parts.next().is_some() || question.is_empty() || answer.is_empty() {
        return None;
    }

    Some(NewCard::new(question, answer))
}
