pub mod handlers;

use axum::Router;
use axum::routing::get;

use crate::api::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compatibilities", get(handlers::list_compatibilities))
        .route("/stats", get(handlers::get_stats))
}
