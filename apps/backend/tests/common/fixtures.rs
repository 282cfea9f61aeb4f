//! Test fixtures and factory functions for request bodies.

use serde_json::json;

/// Generate batch text with a specified number of cards.
pub fn sample_batch_text(num_cards: usize) -> String {
    (1..=num_cards)
        .map(|i| format!("Question {i}?;Answer {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate a deck name unlikely to collide with other test runs.
pub fn unique_deck_name(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{prefix}_{nanos}")
}

pub fn create_deck_request(name: &str) -> serde_json::Value {
    json!({ "name": name })
}

pub fn create_card_request(question: &str, answer: &str) -> serde_json::Value {
    json!({ "question": question, "answer": answer })
}

pub fn edit_card_request(question: &str, answer: &str, extra: Option<&str>) -> serde_json::Value {
    json!({ "question": question, "answer": answer, "extra": extra })
}

pub fn batch_request(text: &str) -> serde_json::Value {
    json!({ "text": text })
}

pub fn answer_request(answer: &str) -> serde_json::Value {
    json!({ "answer": answer })
}
