use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::to_datetime;

/// Flashcard set record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRecord {
    /// Owning user id, immutable after creation
    pub owner: String,
    pub title: String,
    pub description: String,
    pub created_at: i64,
}

/// Flashcard set for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSet {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl FlashcardSet {
    pub fn from_record(id: &str, record: &SetRecord) -> Self {
        Self {
            id: id.to_string(),
            owner: record.owner.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            created_at: to_datetime(record.created_at),
        }
    }
}

/// Set listing entry with its card count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSummary {
    #[serde(flatten)]
    pub set: FlashcardSet,
    pub card_count: usize,
}
