use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::to_datetime;
use crate::constants::MASTERED_REVIEW_DELAY_DAYS;

/// Review status of a single card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Learning,
    Mastered,
}

impl CardStatus {
    /// When a card with this status should next be reviewed
    ///
    /// Mastered cards rest for a few days; learning cards stay due.
    pub fn next_review_after(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            CardStatus::Mastered => now + Duration::days(MASTERED_REVIEW_DELAY_DAYS),
            CardStatus::Learning => now,
        }
    }
}

/// Flashcard record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecord {
    /// Always equal to the owner of `set_id`
    pub owner: String,
    pub set_id: String,
    pub front: String,
    pub back: String,
    pub content_type: String,
    pub status: CardStatus,
    pub next_review_at: i64,
    pub created_at: i64,
}

impl CardRecord {
    /// Apply a review outcome, rescheduling the card
    pub fn review(&mut self, status: CardStatus, now: DateTime<Utc>) {
        self.status = status;
        self.next_review_at = status.next_review_after(now).timestamp();
    }
}

/// Flashcard for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    pub owner: String,
    pub set_id: String,
    pub front: String,
    pub back: String,
    pub content_type: String,
    pub status: CardStatus,
    pub next_review_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn from_record(id: &str, record: &CardRecord) -> Self {
        Self {
            id: id.to_string(),
            owner: record.owner.clone(),
            set_id: record.set_id.clone(),
            front: record.front.clone(),
            back: record.back.clone(),
            content_type: record.content_type.clone(),
            status: record.status,
            next_review_date: to_datetime(record.next_review_at),
            created_at: to_datetime(record.created_at),
        }
    }
}
