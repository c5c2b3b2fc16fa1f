pub mod handlers;

use axum::Router;
use axum::routing::{get, post};

use crate::api::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export", get(handlers::export_prompts))
        .route("/import", post(handlers::import_prompts))
}
