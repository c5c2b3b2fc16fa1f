pub mod auth;
pub mod compat;
pub mod error;
pub mod middleware;
pub mod prompts;
mod routes;
pub mod transfer;

use std::sync::Arc;

use axum::Router;

use crate::api::auth::repository::TokenStore;
use crate::prompts::repository::PromptRepository;

/// Application context constructed once at startup and handed to the
/// router. Collaborators are trait objects so tests can swap the store.
#[derive(Clone)]
pub struct AppState {
    pub prompt_repo: Arc<dyn PromptRepository>,
    /// One-time tokens guarding mutating endpoints.
    pub tokens: Arc<TokenStore>,
    /// Admin bearer token; mutations are rejected when unset.
    pub admin_token: Option<String>,
}

pub fn create_app(state: AppState) -> Router {
    routes::build_router(state)
}
