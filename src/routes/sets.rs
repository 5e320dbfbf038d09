use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::{parse_id, Flashcard, FlashcardSet, SetSummary};
use crate::routes::auth::MessageResponse;
use crate::sync::{find_owned_set, CardInput, SetDraft, SetWithCards};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddCardRequest {
    pub term: String,
    pub definition: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

/// Create a set and its cards
///
/// Cards are generated one at a time in submission order. A card whose
/// generation fails keeps its raw definition.
pub async fn create_set(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetDraft>,
) -> Result<Json<SetWithCards>> {
    let result = state.synchronizer().create_set(&user.id, payload).await?;
    Ok(Json(result))
}

/// Replace a set's metadata and cards
pub async fn update_set(
    State(state): State<AppState>,
    user: AuthUser,
    Path(set_id): Path<String>,
    Json(payload): Json<SetDraft>,
) -> Result<Json<SetWithCards>> {
    let result = state
        .synchronizer()
        .update_set(&user.id, &set_id, payload)
        .await?;
    Ok(Json(result))
}

/// List the caller's sets, newest first, with card counts
pub async fn list_sets(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<SetSummary>>> {
    let mut sets = state.store.find_sets_by_owner(&user.id).await?;
    sets.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at));

    let mut summaries = Vec::with_capacity(sets.len());
    for (set_id, record) in sets {
        let card_count = state.store.count_cards_by_set(&set_id).await?;
        summaries.push(SetSummary {
            set: FlashcardSet::from_record(&set_id, &record),
            card_count,
        });
    }

    Ok(Json(summaries))
}

/// A single set with all of its cards in creation order
pub async fn get_set(
    State(state): State<AppState>,
    user: AuthUser,
    Path(set_id): Path<String>,
) -> Result<Json<SetWithCards>> {
    let (set_id, record) = find_owned_set(&state.store, &user.id, &set_id).await?;

    let cards = state
        .store
        .find_cards_by_set(&set_id)
        .await?
        .iter()
        .map(|(id, card)| Flashcard::from_record(id, card))
        .collect();

    Ok(Json(SetWithCards {
        set: FlashcardSet::from_record(&set_id, &record),
        cards,
    }))
}

/// Delete a set and every card in it
pub async fn delete_set(
    State(state): State<AppState>,
    user: AuthUser,
    Path(set_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let (set_id, _) = find_owned_set(&state.store, &user.id, &set_id).await?;

    let cards_deleted = state.store.delete_cards_by_set(&set_id).await?;
    state.store.delete_set(&set_id).await?;

    tracing::info!(set_id = %set_id, cards = cards_deleted, "Set deleted");

    Ok(MessageResponse::ok("Set deleted"))
}

/// Add one card to an existing set
pub async fn add_card(
    State(state): State<AppState>,
    user: AuthUser,
    Path(set_id): Path<String>,
    Json(payload): Json<AddCardRequest>,
) -> Result<Json<Flashcard>> {
    let input = CardInput {
        term: payload.term,
        definition: payload.definition,
    };
    let card = state
        .synchronizer()
        .add_card(&user.id, &set_id, input, payload.content_type.as_deref())
        .await?;
    Ok(Json(card))
}

/// Delete one card from a set
pub async fn delete_card(
    State(state): State<AppState>,
    user: AuthUser,
    Path((set_id, card_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    let set_id = parse_id(&set_id)?;
    let card_id = parse_id(&card_id)?;

    let card = state
        .store
        .find_card(&card_id)
        .await?
        .filter(|card| card.set_id == set_id)
        .ok_or(AppError::CardNotFound)?;

    if card.owner != user.id {
        tracing::warn!(card_id = %card_id, "Card delete by non-owner");
        return Err(AppError::Forbidden);
    }

    state.store.delete_card(&card_id).await?;
    tracing::info!(card_id = %card_id, "Card deleted");

    Ok(MessageResponse::ok("Card deleted"))
}
