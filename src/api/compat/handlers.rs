use axum::Json;
use axum::extract::State;
use serde_json::{Map, Value, json};

use crate::api::AppState;
use crate::prompts::PromptStatus;
use crate::prompts::repository::{PromptQuery, PromptRepository};

/// All registered compatibility tags with their usage counts.
pub(crate) async fn list_compatibilities(State(state): State<AppState>) -> Json<Value> {
    let tags = state.prompt_repo.list_tags().await;
    let tags: Vec<Value> = tags
        .iter()
        .map(|t| json!({ "name": t.name, "slug": t.slug, "count": t.count }))
        .collect();
    Json(json!(tags))
}

/// Aggregate stats: published and draft totals plus per-tag counts.
pub(crate) async fn get_stats(State(state): State<AppState>) -> Json<Value> {
    let count_for = |status: PromptStatus| PromptQuery {
        status: Some(status),
        per_page: 0,
        ..Default::default()
    };
    let published = state.prompt_repo.query(&count_for(PromptStatus::Published)).await.total;
    let drafts = state.prompt_repo.query(&count_for(PromptStatus::Draft)).await.total;

    let mut by_compatibility = Map::new();
    for tag in state.prompt_repo.list_tags().await {
        by_compatibility.insert(tag.slug, json!(tag.count));
    }

    Json(json!({
        "total_prompts": published,
        "draft_prompts": drafts,
        "by_compatibility": by_compatibility,
    }))
}
