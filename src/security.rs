use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Password Hashing
// =============================================================================

/// Generate a fresh random salt for a password hash
pub fn generate_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn password_mac(password: &str, salt: &str, pepper: &str) -> Option<HmacSha256> {
    let mut mac = match HmacSha256::new_from_slice(pepper.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return None;
        }
    };
    mac.update(salt.as_bytes());
    mac.update(password.as_bytes());
    Some(mac)
}

/// Hash a password with a per-user salt and the server-side pepper
///
/// # Algorithm
/// `hash = HMAC-SHA256(key = pepper, salt || password)`, hex encoded
///
/// The pepper lives in the environment, never in the database, so a leaked
/// database alone is not enough to test password guesses.
pub fn hash_password(password: &str, salt: &str, pepper: &str) -> String {
    password_mac(password, salt, pepper)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Verify a password against a stored hash in constant time
pub fn verify_password(password: &str, salt: &str, pepper: &str, stored_hash: &str) -> bool {
    let expected = match hex::decode(stored_hash) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Stored password hash is not valid hex");
            return false;
        }
    };

    match password_mac(password, salt, pepper) {
        Some(mac) => mac.verify_slice(&expected).is_ok(),
        None => false,
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// JWT claims carried by every authenticated request
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiry (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Issue an HS256 token for a user
pub fn issue_token(
    user_id: &str,
    secret: &str,
    expiry_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + expiry_secs).max(0) as usize,
        iat: now.max(0) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token's signature and expiry, returning its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}
