use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{AuthServiceState, error_response, rate_limited_response};
use crate::auth::check_password;
use crate::middleware::AuthUser;
use crate::models::{AuthResponse, IdentityPayload, LoginRequest, RegisterRequest};
use crate::storage::{Account, StorageError};

fn throttle_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue(state: &AuthServiceState, account: &Account) -> Result<AuthResponse, Response> {
    let token = state
        .tokens
        .create_token(&account.id, &account.email, &account.role)
        .map_err(|e| {
            error!("Failed to create token: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create token")
        })?;

    Ok(AuthResponse {
        user: Some(account.payload()),
        token: Some(token),
    })
}

/// Check `password` for the account found by email. Without an account the
/// placeholder hash is checked instead and the result discarded, so an
/// unknown email takes as long to reject as a wrong password.
fn password_matches(
    state: &AuthServiceState,
    password: &str,
    account: Option<&Account>,
) -> Result<bool, bcrypt::BcryptError> {
    match account {
        Some(account) => bcrypt::verify(password, &account.password_hash),
        None => {
            let _ = bcrypt::verify(password, &state.dummy_hash);
            Ok(false)
        }
    }
}

pub async fn register(
    State(state): State<AuthServiceState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), Response> {
    let email = payload.email.trim().to_string();

    if payload.first_name.trim().is_empty()
        || payload.last_name.trim().is_empty()
        || email.is_empty()
        || payload.password.is_empty()
    {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "First name, last name, email, and password are required",
        ));
    }

    if !payload.role.is_recognized() {
        warn!("Registration for {} with unknown role '{}'", email, payload.role);
        return Err(error_response(StatusCode::BAD_REQUEST, "Unknown role"));
    }

    if check_password(&payload.password).is_err() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            crate::auth::PASSWORD_REQUIREMENTS,
        ));
    }

    let existing = state.accounts.find_by_email(&email).await.map_err(|e| {
        error!("Account lookup failed: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Account lookup failed")
    })?;
    if existing.is_some() {
        return Err(error_response(StatusCode::CONFLICT, "Email already registered"));
    }

    let password_hash = bcrypt::hash(&payload.password, state.bcrypt_cost).map_err(|e| {
        error!("Failed to hash password: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
    })?;

    let account = Account {
        id: Uuid::new_v4().to_string(),
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        email,
        password_hash,
        role: payload.role,
        created_at: Utc::now(),
    };

    state
        .accounts
        .create_account(account.clone())
        .await
        .map_err(|e| match e {
            StorageError::AlreadyExists => {
                error_response(StatusCode::CONFLICT, "Email already registered")
            }
        })?;

    info!("Registered {} as {}", account.email, account.role);

    Ok((StatusCode::CREATED, Json(issue(&state, &account)?)))
}

pub async fn login(
    State(state): State<AuthServiceState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), Response> {
    let key = throttle_key(&payload.email);

    if let Some(retry_after) = state.throttle.retry_after(&key).await {
        warn!("Login for {} refused while blocked", key);
        return Err(rate_limited_response(retry_after));
    }

    let account = state.accounts.find_by_email(&key).await.map_err(|e| {
        error!("Account lookup failed: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Account lookup failed")
    })?;

    let is_valid =
        password_matches(&state, &payload.password, account.as_ref()).map_err(|e| {
            error!("Password verification failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password verification failed",
            )
        })?;

    let account = match account {
        Some(account) if is_valid => account,
        _ => {
            state.throttle.record_failed_attempt(&key).await;
            return Err(error_response(StatusCode::UNAUTHORIZED, "Invalid credentials"));
        }
    };

    state.throttle.reset(&key).await;
    info!("Login succeeded for {}", account.email);

    Ok((StatusCode::OK, Json(issue(&state, &account)?)))
}

pub async fn verify(
    State(state): State<AuthServiceState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<IdentityPayload>, Response> {
    let account = state
        .accounts
        .get_account(&auth_user.claims.sub)
        .await
        .map_err(|e| {
            error!("Account lookup failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Account lookup failed")
        })?
        .ok_or_else(|| {
            warn!(
                "Token for {} refers to a missing account",
                auth_user.claims.email
            );
            error_response(StatusCode::UNAUTHORIZED, "Invalid token")
        })?;

    Ok(Json(account.payload()))
}
