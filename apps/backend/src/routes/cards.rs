//! Card endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/decks/:deck_id/cards
pub async fn create(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<Card>)> {
    let card = state
        .service
        .create_card(deck_id, payload.into(), Utc::now())
        .await?;

    tracing::debug!(card_id = card.id, deck_id, "card created");
    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/cards/:card_id
/// Edits the card text; scheduling state is kept
pub async fn edit(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(payload): Json<EditCardRequest>,
) -> Result<Json<Card>> {
    let card = state.service.edit_card(card_id, payload.into()).await?;
    Ok(Json(card))
}

/// DELETE /api/cards/:card_id
pub async fn delete(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    state.service.delete_card(card_id).await?;
    Ok(Json(DeletedResponse { deleted: card_id }))
}
