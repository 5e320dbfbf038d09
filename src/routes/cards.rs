use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::{parse_id, CardStatus, Flashcard};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: CardStatus,
}

/// Record a review outcome for a card
///
/// Mastered cards are scheduled a few days out; learning cards stay due.
pub async fn update_card_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(card_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Flashcard>> {
    let card_id = parse_id(&card_id)?;
    let mut card = state
        .store
        .find_card(&card_id)
        .await?
        .ok_or(AppError::CardNotFound)?;

    if card.owner != user.id {
        tracing::warn!(card_id = %card_id, "Card review by non-owner");
        return Err(AppError::Forbidden);
    }

    card.review(payload.status, Utc::now());
    state.store.update_card(&card_id, card.clone()).await?;

    tracing::debug!(card_id = %card_id, status = ?card.status, "Card reviewed");

    Ok(Json(Flashcard::from_record(&card_id, &card)))
}

/// Cards due for review now, soonest first
pub async fn due_cards(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Flashcard>>> {
    let now = Utc::now().timestamp();

    let mut due: Vec<_> = state
        .store
        .find_cards_by_owner(&user.id)
        .await?
        .into_iter()
        .filter(|(_, card)| card.next_review_at <= now)
        .collect();
    due.sort_by_key(|(_, card)| card.next_review_at);

    Ok(Json(
        due.iter()
            .map(|(id, card)| Flashcard::from_record(id, card))
            .collect(),
    ))
}
