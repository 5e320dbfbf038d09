use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::to_datetime;

/// Streak bookkeeping kept on every user
///
/// Mutated only by [`crate::streak::touch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Consecutive active calendar days
    pub streak: u32,
    /// Last instant the streak advanced or restarted (Unix timestamp)
    pub last_active_at: Option<i64>,
    /// Chronological `YYYY-MM-DD` dates, no duplicates, bounded length
    pub active_days: Vec<String>,
}

impl StreakState {
    /// State of a freshly registered user: day one of a streak, nothing logged yet
    pub fn new_registration(now: i64) -> Self {
        Self {
            streak: 1,
            last_active_at: Some(now),
            active_days: Vec::new(),
        }
    }
}

/// User record stored in redb
/// Uses Unix timestamps for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    /// Lower-cased, unique across users
    pub email: String,
    /// Hex HMAC-SHA256 of the password (see `security::hash_password`)
    pub password_hash: String,
    pub password_salt: String,
    pub streak: StreakState,
    pub reminder_enabled: bool,
    pub reminder_time: Option<String>,
    pub created_at: i64,
}

/// User profile for API responses (never carries password material)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub streak: u32,
    pub last_active_date: Option<DateTime<Utc>>,
    pub active_days: Vec<String>,
    pub reminder_enabled: bool,
    pub reminder_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn from_record(id: &str, record: &UserRecord) -> Self {
        Self {
            id: id.to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            streak: record.streak.streak,
            last_active_date: record.streak.last_active_at.map(to_datetime),
            active_days: record.streak.active_days.clone(),
            reminder_enabled: record.reminder_enabled,
            reminder_time: record.reminder_time.clone(),
            created_at: to_datetime(record.created_at),
        }
    }
}

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal sanity check; delivery is never attempted
pub fn validate_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Validate an `HH:MM` reminder time
pub fn validate_reminder_time(time: &str) -> bool {
    chrono::NaiveTime::parse_from_str(time, "%H:%M").is_ok()
}
