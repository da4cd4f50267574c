use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::handlers::AuthServiceState;
use crate::models::Claims;

// Extension to store claims in request
#[derive(Clone)]
pub struct AuthUser {
    pub claims: Claims,
}

/// Require a valid `Authorization: Bearer <token>` header
pub async fn auth_middleware(
    State(state): State<AuthServiceState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = state.tokens.validate_token(token).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(AuthUser { claims });

    Ok(next.run(request).await)
}
