pub mod handlers;
pub mod repository;

use axum::Router;
use axum::http::HeaderMap;
use axum::routing::post;

use crate::api::AppState;
use crate::api::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/csrf-token", post(handlers::issue_csrf_token))
}

/// Elevated-permission check for mutating endpoints: the request must
/// carry `Authorization: Bearer <admin token>`. Fails closed when no
/// admin token is configured.
pub(crate) fn require_editor(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::Forbidden(
            "no admin token configured; mutations are disabled",
        ));
    };
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(ApiError::Forbidden("invalid admin token")),
        None => Err(ApiError::Unauthorized("missing bearer token")),
    }
}

/// One-time-token check for mutating endpoints. The token arrives in
/// `X-Csrf-Token` and is spent on use. Runs before any side effect.
pub(crate) fn consume_csrf(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let token = headers
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Forbidden("missing csrf token"))?;
    if state.tokens.consume(token) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("invalid or already used csrf token"))
    }
}

/// Both guards in order; the csrf token is only consumed when the
/// bearer check passed.
pub(crate) fn require_mutation(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    require_editor(state, headers)?;
    consume_csrf(state, headers)
}
