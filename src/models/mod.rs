pub mod card;
pub mod set;
pub mod user;

pub use card::{CardRecord, CardStatus, Flashcard};
pub use set::{FlashcardSet, SetRecord, SetSummary};
pub use user::{StreakState, UserProfile, UserRecord};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::constants::ERR_INVALID_ID;
use crate::error::{AppError, Result};

/// Generate a fresh document identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse a client-supplied identifier, normalizing it to the stored form
pub fn parse_id(raw: &str) -> Result<String> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidInput(ERR_INVALID_ID.to_string()))
}

/// Convert a stored Unix timestamp into a UTC datetime
///
/// An out-of-range value can only come from a corrupted record; it is logged
/// and replaced by the current time.
pub fn to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_else(|| {
        tracing::warn!(timestamp, "Stored timestamp out of range, substituting now");
        Utc::now()
    })
}
