use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::error::AppError;
use crate::security::verify_token;
use crate::AppState;

/// Legacy header some clients send the raw token in
const TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated caller, resolved from a bearer token
///
/// Every ownership check in the service trusts this id.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let from_authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    from_authorization
        .or_else(|| headers.get(TOKEN_HEADER).and_then(|value| value.to_str().ok()))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let claims = verify_token(token, &state.config.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::Unauthorized
        })?;

        // Tokens outlive deleted accounts
        if state.store.find_user(&claims.sub).await?.is_none() {
            tracing::warn!("Token for unknown user");
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser { id: claims.sub })
    }
}
