//! Deck endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/decks
pub async fn list(State(state): State<AppState>) -> Result<Json<DeckListResponse>> {
    let decks = state.service.list_decks().await?;
    Ok(Json(DeckListResponse { decks }))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateDeckRequest>,
) -> Result<(StatusCode, Json<Deck>)> {
    let deck = state.service.create_deck(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(deck)))
}

/// GET /api/decks/:deck_id
pub async fn get(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<DeckDetailResponse>> {
    let (deck, cards) = state.service.deck_cards(deck_id).await?;
    Ok(Json(DeckDetailResponse { deck, cards }))
}

/// DELETE /api/decks/:deck_id
/// Removes the deck together with its cards
pub async fn delete(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    state.service.delete_deck(deck_id).await?;
    Ok(Json(DeletedResponse { deleted: deck_id }))
}

/// POST /api/decks/:deck_id/batch
/// Imports one `question;answer` card per line
pub async fn batch_add(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<BatchAddRequest>,
) -> Result<Json<BatchAddResponse>> {
    let report = state
        .service
        .batch_add(deck_id, &payload.text, Utc::now())
        .await?;
    Ok(Json(report.into()))
}
