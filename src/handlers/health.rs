use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::AuthServiceState;

pub async fn health_check(State(state): State<AuthServiceState>) -> (StatusCode, Json<Value>) {
    let accounts = state.accounts.count_accounts().await.ok();

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "visit-portal-auth",
            "version": env!("CARGO_PKG_VERSION"),
            "accounts": accounts,
        })),
    )
}
