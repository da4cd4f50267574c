// Development auth service: the three endpoints the portal consumes

pub mod auth;
pub mod health;

use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::auth::TokenIssuer;
use crate::config::ServerConfig;
use crate::middleware::{LoginThrottle, auth_middleware};
use crate::storage::{AccountStorage, MemoryAccountStorage};

/// Hashed once per service so lookups of unknown emails cost one bcrypt check
const UNKNOWN_ACCOUNT_PASSWORD: &str = "unknown-account-placeholder";

/// Shared state of the auth service router
#[derive(Clone)]
pub struct AuthServiceState {
    pub accounts: Arc<dyn AccountStorage>,
    pub throttle: Arc<LoginThrottle>,
    pub tokens: TokenIssuer,
    pub bcrypt_cost: u32,
    /// Compared against when no account matches the email
    pub dummy_hash: Arc<str>,
}

impl AuthServiceState {
    pub fn new(accounts: Arc<dyn AccountStorage>, config: &ServerConfig) -> Self {
        let dummy_hash = bcrypt::hash(UNKNOWN_ACCOUNT_PASSWORD, config.bcrypt_cost)
            .unwrap_or_else(|e| {
                warn!("Failed to prepare placeholder hash: {}", e);
                String::new()
            });

        Self {
            accounts,
            throttle: Arc::new(LoginThrottle::new(
                config.max_failed_attempts,
                config.block_duration_secs,
            )),
            tokens: TokenIssuer::new(config.jwt_secret.clone(), config.token_expiration_secs),
            bcrypt_cost: config.bcrypt_cost,
            dummy_hash: dummy_hash.into(),
        }
    }

    /// State backed by fresh in-memory accounts
    pub fn in_memory(config: &ServerConfig) -> Self {
        Self::new(Arc::new(MemoryAccountStorage::new()), config)
    }
}

/// Build the auth service router
pub fn router(state: AuthServiceState) -> Router {
    let protected = Router::new()
        .route("/auth/verify", get(auth::verify))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn rate_limited_response(retry_after: u64) -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after.to_string())],
        Json(json!({ "error": "Too many failed attempts" })),
    )
        .into_response()
}
