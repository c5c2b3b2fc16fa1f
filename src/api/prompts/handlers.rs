use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use hyper::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::error::ApiError;
use crate::api::{AppState, auth};
use crate::prompts::repository::{NewPrompt, PromptPatch, PromptQuery, PromptRepository};
use crate::prompts::{PromptRecord, PromptStatus};

const EXCERPT_WORDS: usize = 20;

pub(crate) fn projection(record: &PromptRecord) -> Value {
    json!({
        "id": record.id,
        "title": record.title,
        "slug": record.slug,
        "content": record.content,
        "excerpt": record.excerpt(EXCERPT_WORDS),
        "character_count": record.character_count,
        "word_count": record.word_count,
        "compatibility": record.compatibility,
        "status": record.status,
        "created_at": record.created_at,
        "modified_at": record.modified_at,
    })
}

#[derive(Deserialize)]
pub(crate) struct ListQuery {
    compatibility: Option<String>,
    search: Option<String>,
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_per_page")]
    per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    10
}

/// Published prompts, tag-filtered and search-augmented. Totals travel
/// out-of-band in `X-Total` / `X-Total-Pages` headers.
pub(crate) async fn list_prompts(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> impl IntoResponse {
    let page = state
        .prompt_repo
        .query(&PromptQuery {
            status: Some(PromptStatus::Published),
            compatibility: params.compatibility,
            search: params.search,
            page: params.page,
            per_page: params.per_page.max(1),
        })
        .await;

    let prompts: Vec<Value> = page.records.iter().map(projection).collect();
    (
        [
            ("x-total", page.total.to_string()),
            ("x-total-pages", page.total_pages.to_string()),
        ],
        Json(prompts),
    )
}

pub(crate) async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = state
        .prompt_repo
        .get(&id)
        .await
        .ok_or(ApiError::NotFound("prompt not found"))?;
    Ok(Json(projection(&record)))
}

#[derive(Deserialize)]
pub(crate) struct CreatePromptRequest {
    title: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    compatibility: Vec<String>,
    status: Option<PromptStatus>,
}

pub(crate) async fn create_prompt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreatePromptRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth::require_mutation(&state, &headers)?;

    let record = state
        .prompt_repo
        .create(NewPrompt {
            title: body.title,
            slug: body.slug,
            content: body.content,
            compatibility: body.compatibility,
            status: body.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(projection(&record))))
}

#[derive(Deserialize)]
pub(crate) struct UpdatePromptRequest {
    title: Option<String>,
    content: Option<String>,
    status: Option<PromptStatus>,
    compatibility: Option<Vec<String>>,
}

pub(crate) async fn update_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdatePromptRequest>,
) -> Result<Json<Value>, ApiError> {
    auth::require_mutation(&state, &headers)?;

    let record = state
        .prompt_repo
        .update(
            &id,
            PromptPatch {
                title: body.title,
                content: body.content,
                status: body.status,
                compatibility: body.compatibility,
            },
        )
        .await?;
    Ok(Json(projection(&record)))
}

/// Soft delete — the record is trashed, not removed, and drops out of
/// slug lookups and listings.
pub(crate) async fn delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    auth::require_mutation(&state, &headers)?;

    let existed = state.prompt_repo.delete(&id).await?;
    if !existed {
        return Err(ApiError::NotFound("prompt not found"));
    }
    Ok(Json(json!({ "trashed": true })))
}

/// Copy a prompt into a new draft titled "<original> (Copy)". Content
/// and tags carry over; counts are recomputed on the copy.
pub(crate) async fn duplicate_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth::require_mutation(&state, &headers)?;

    let original = state
        .prompt_repo
        .get(&id)
        .await
        .ok_or(ApiError::NotFound("prompt not found"))?;

    let copy = state
        .prompt_repo
        .create(NewPrompt {
            title: format!("{} (Copy)", original.title),
            slug: original.slug.clone(),
            content: original.content.clone(),
            compatibility: original.compatibility.clone(),
            status: Some(PromptStatus::Draft),
        })
        .await?;
    tracing::info!(from = %original.id, to = %copy.id, "duplicated prompt");
    Ok((StatusCode::CREATED, Json(projection(&copy))))
}
