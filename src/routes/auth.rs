use axum::{extract::State, http::StatusCode, Json};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::{
    ERR_INVALID_EMAIL, ERR_NAME_REQUIRED, ERR_PASSWORD_TOO_SHORT, ERR_WRONG_CURRENT_PASSWORD,
    MIN_PASSWORD_LEN,
};
use crate::error::{AppError, Result};
use crate::models::user::{normalize_email, validate_email, validate_reminder_time};
use crate::models::{new_id, StreakState, UserProfile, UserRecord};
use crate::security::{generate_salt, hash_password, issue_token, verify_password};
use crate::streak::{record_activity, StreakSummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(ERR_PASSWORD_TOO_SHORT.to_string()));
    }
    Ok(())
}

/// Register a new user
///
/// The account starts on day one of a streak with an empty activity log.
/// Returns 409 Conflict if the email is already registered.
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput(ERR_NAME_REQUIRED.to_string()));
    }
    if !validate_email(&payload.email) {
        return Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string()));
    }
    validate_password(&payload.password)?;

    let now = Utc::now().timestamp();
    let salt = generate_salt();
    let record = UserRecord {
        name: name.to_string(),
        email: normalize_email(&payload.email),
        password_hash: hash_password(&payload.password, &salt, &state.config.password_pepper),
        password_salt: salt,
        streak: StreakState::new_registration(now),
        reminder_enabled: false,
        reminder_time: None,
        created_at: now,
    };

    let user_id = new_id();
    state.store.insert_user(&user_id, record).await?;
    tracing::info!(user_id = %user_id, "New user registered");

    Ok((
        StatusCode::CREATED,
        MessageResponse::ok("User registered successfully. Please login."),
    ))
}

/// Log in with email and password
///
/// Counts as daily activity for the streak.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (user_id, record) = state
        .store
        .find_user_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(
        &payload.password,
        &record.password_salt,
        &state.config.password_pepper,
        &record.password_hash,
    ) {
        tracing::warn!(user_id = %user_id, "Failed login attempt");
        return Err(AppError::InvalidCredentials);
    }

    record_activity(&state.store, &user_id, Local::now()).await?;

    let token = issue_token(&user_id, &state.config.jwt_secret, state.config.jwt_expiry_secs)?;
    tracing::info!(user_id = %user_id, "User logged in");

    Ok(Json(LoginResponse { token }))
}

/// Current user's profile; counts as daily activity
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserProfile>> {
    let record = record_activity(&state.store, &user.id, Local::now()).await?;
    Ok(Json(UserProfile::from_record(&user.id, &record)))
}

/// Current streak with the most recent active days; counts as daily activity
pub async fn get_streak(State(state): State<AppState>, user: AuthUser) -> Result<Json<StreakSummary>> {
    let record = record_activity(&state.store, &user.id, Local::now()).await?;
    Ok(Json(StreakSummary::from_record(&record)))
}

/// Update profile fields; absent or empty fields are left as they are
///
/// Input is validated first, then applied to the latest stored record in a
/// single write so a concurrent login cannot undo the change.
pub async fn update_details(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateDetailsRequest>,
) -> Result<Json<UserProfile>> {
    let name = payload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let email = match payload.email.filter(|email| !email.trim().is_empty()) {
        Some(email) if !validate_email(&email) => {
            return Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string()));
        }
        email => email.map(|email| normalize_email(&email)),
    };

    let reminder_time = payload.reminder_time.filter(|time| !time.is_empty());
    if let Some(time) = reminder_time.as_deref() {
        if !validate_reminder_time(time) {
            return Err(AppError::InvalidInput(
                "Reminder time must be HH:MM".to_string(),
            ));
        }
    }
    let reminder_enabled = payload.reminder_enabled;

    let (record, ()) = state
        .store
        .modify_user(&user.id, move |record| {
            if let Some(name) = name {
                record.name = name;
            }
            if let Some(email) = email {
                record.email = email;
            }
            if let Some(enabled) = reminder_enabled {
                record.reminder_enabled = enabled;
            }
            if let Some(time) = reminder_time {
                record.reminder_time = Some(time);
            }
            Ok(())
        })
        .await?;
    tracing::info!(user_id = %user.id, "User details updated");

    Ok(Json(UserProfile::from_record(&user.id, &record)))
}

/// Change password after verifying the current one
pub async fn update_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    validate_password(&payload.new_password)?;
    let pepper = state.config.password_pepper.clone();

    state
        .store
        .modify_user(&user.id, move |record| {
            if !verify_password(
                &payload.old_password,
                &record.password_salt,
                &pepper,
                &record.password_hash,
            ) {
                return Err(AppError::InvalidInput(ERR_WRONG_CURRENT_PASSWORD.to_string()));
            }
            let salt = generate_salt();
            record.password_hash = hash_password(&payload.new_password, &salt, &pepper);
            record.password_salt = salt;
            Ok(())
        })
        .await?;
    tracing::info!(user_id = %user.id, "Password updated");

    Ok(MessageResponse::ok("Password updated successfully"))
}

/// Delete the account with all of its sets and cards
///
/// Cards go first, then sets, then the user. A failure part-way leaves the
/// already-deleted records deleted.
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MessageResponse>> {
    let sets = state.store.find_sets_by_owner(&user.id).await?;

    let mut cards_deleted = 0;
    for (set_id, _) in &sets {
        cards_deleted += state.store.delete_cards_by_set(set_id).await?;
    }
    for (set_id, _) in &sets {
        state.store.delete_set(set_id).await?;
    }
    state.store.delete_user(&user.id).await?;

    tracing::info!(
        user_id = %user.id,
        sets = sets.len(),
        cards = cards_deleted,
        "Account deleted"
    );

    Ok(MessageResponse::ok("Account deleted"))
}
