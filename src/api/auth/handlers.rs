use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value, json};

use crate::api::AppState;
use crate::api::error::ApiError;

/// Issue a one-time token for a subsequent mutating request. Requires
/// the admin bearer token; the one-time token is consumed by the next
/// mutation that presents it.
pub(crate) async fn issue_csrf_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    super::require_editor(&state, &headers)?;
    let token = state.tokens.issue();
    Ok(Json(json!({ "token": token })))
}
