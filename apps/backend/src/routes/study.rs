//! Study endpoints
//!
//! A session alternates GET (present the most due card with its choices)
//! and POST (grade the answer, then present the next card of the same queue).

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use study_core::StudyMode;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/decks/:deck_id/learning
pub async fn learning_queue(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<StudyStepResponse>> {
    next_step(&state, deck_id, StudyMode::Learning).await.map(Json)
}

/// POST /api/cards/:card_id/learning
pub async fn answer_learning(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    answer(&state, card_id, &payload.answer, StudyMode::Learning)
        .await
        .map(Json)
}

/// GET /api/decks/:deck_id/review
pub async fn review_queue(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<StudyStepResponse>> {
    next_step(&state, deck_id, StudyMode::Review).await.map(Json)
}

/// POST /api/cards/:card_id/review
pub async fn answer_review(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    answer(&state, card_id, &payload.answer, StudyMode::Review)
        .await
        .map(Json)
}

async fn next_step(state: &AppState, deck_id: i64, mode: StudyMode) -> Result<StudyStepResponse> {
    let question = state
        .service
        .next_question(deck_id, mode, Utc::now())
        .await?;
    Ok(StudyStepResponse::from_question(deck_id, question))
}

async fn answer(state: &AppState, card_id: i64, submitted: &str, mode: StudyMode) -> Result<AnswerResponse> {
    let outcome = state
        .service
        .submit_answer(card_id, submitted, Utc::now())
        .await?;

    if outcome.graded {
        tracing::info!(
            card_id,
            correct = outcome.correct,
            stage = outcome.card.stage.as_str(),
            "answer submitted"
        );
    }

    let next = next_step(state, outcome.card.deck_id, mode).await?;
    Ok(AnswerResponse::new(outcome, next))
}
