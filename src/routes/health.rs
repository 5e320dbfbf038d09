use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness check
///
/// Reports whether the store answers a read and whether card generation is
/// configured. Always 200; callers inspect `status`.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!("Store ping failed: {}", e);
            "disconnected"
        }
    };
    let generator = if state.config.gemini_api_key.is_some() {
        "enabled"
    } else {
        "disabled"
    };

    Json(json!({
        "status": if database == "connected" { "healthy" } else { "unhealthy" },
        "database": database,
        "generator": generator,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
