//! Daily streak and activity-log tracking.
//!
//! [`touch`] is a pure transition over [`StreakState`]; [`record_activity`]
//! loads a user, applies it and writes the result back.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::constants::{ACTIVE_DAYS_RETURNED, ACTIVE_DAY_FORMAT, MAX_ACTIVE_DAYS};
use crate::db::Store;
use crate::error::Result;
use crate::models::{to_datetime, StreakState, UserRecord};

/// Which branch of the streak transition ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    /// No previous activity; streak starts at 1
    Started,
    /// Already active today; streak unchanged
    AlreadyCounted,
    /// Active yesterday; streak incremented
    Extended,
    /// Gap of more than one day; streak restarted at 1
    Reset,
}

/// Apply one activity at `now` to a streak
///
/// Days are compared in `now`'s time zone. The day difference is absolute, so
/// a clock that moved backwards is treated like one that moved forwards.
/// Calling this repeatedly on the same calendar day changes nothing after the
/// first call.
pub fn touch<Tz: TimeZone>(state: &mut StreakState, now: &DateTime<Tz>) -> StreakOutcome {
    let today = now.date_naive();
    let last = state
        .last_active_at
        .map(|ts| to_datetime(ts).with_timezone(&now.timezone()).date_naive());

    let outcome = match last {
        None => StreakOutcome::Started,
        Some(last) => match (today - last).num_days().abs() {
            0 => StreakOutcome::AlreadyCounted,
            1 => StreakOutcome::Extended,
            _ => StreakOutcome::Reset,
        },
    };

    match outcome {
        StreakOutcome::Started | StreakOutcome::Reset => state.streak = 1,
        StreakOutcome::Extended => state.streak += 1,
        StreakOutcome::AlreadyCounted => {}
    }
    if outcome != StreakOutcome::AlreadyCounted {
        state.last_active_at = Some(now.timestamp());
    }

    let day = today.format(ACTIVE_DAY_FORMAT).to_string();
    if !state.active_days.contains(&day) {
        state.active_days.push(day);
    }
    if state.active_days.len() > MAX_ACTIVE_DAYS {
        let excess = state.active_days.len() - MAX_ACTIVE_DAYS;
        state.active_days.drain(..excess);
    }

    outcome
}

/// Streak snapshot returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub streak: u32,
    pub last_active_date: Option<DateTime<chrono::Utc>>,
    /// Most recent active days only; the full log stays server-side
    pub active_days: Vec<String>,
    pub name: String,
}

impl StreakSummary {
    pub fn from_record(record: &UserRecord) -> Self {
        let days = &record.streak.active_days;
        let recent = &days[days.len().saturating_sub(ACTIVE_DAYS_RETURNED)..];
        Self {
            streak: record.streak.streak,
            last_active_date: record.streak.last_active_at.map(to_datetime),
            active_days: recent.to_vec(),
            name: record.name.clone(),
        }
    }
}

/// Mark a user active at `now` and persist the new streak state
///
/// Always writes, even when the day was already counted. The streak is
/// updated inside the same write transaction that reads it, so a concurrent
/// profile edit is never rolled back by a login.
#[tracing::instrument(skip(store, now), fields(outcome = tracing::field::Empty))]
pub async fn record_activity<Tz>(
    store: &Store,
    user_id: &str,
    now: DateTime<Tz>,
) -> Result<UserRecord>
where
    Tz: TimeZone + Send + 'static,
    Tz::Offset: Send,
{
    let (record, outcome) = store
        .modify_user(user_id, move |record| Ok(touch(&mut record.streak, &now)))
        .await?;

    tracing::Span::current().record("outcome", tracing::field::debug(outcome));
    tracing::debug!(streak = record.streak.streak, "Streak updated");

    Ok(record)
}
