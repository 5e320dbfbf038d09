use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::CardStatus;
use crate::AppState;

/// Dashboard counters for the current user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_sets: usize,
    pub cards_mastered: usize,
    pub streak: u32,
}

/// Study statistics
///
/// Reads the streak without counting the request as activity.
pub async fn get_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<StatsResponse>> {
    let total_sets = state.store.find_sets_by_owner(&user.id).await?.len();

    let cards_mastered = state
        .store
        .find_cards_by_owner(&user.id)
        .await?
        .iter()
        .filter(|(_, card)| card.status == CardStatus::Mastered)
        .count();

    let streak = state
        .store
        .find_user(&user.id)
        .await?
        .ok_or(AppError::UserNotFound)?
        .streak
        .streak;

    Ok(Json(StatsResponse {
        total_sets,
        cards_mastered,
        streak,
    }))
}
