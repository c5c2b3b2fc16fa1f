use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use hyper::header;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::error::ApiError;
use crate::api::{AppState, auth};
use crate::prompts::export::{export_filename, export_records};
use crate::prompts::reconcile::{self, ImportDocument, ImportMode};
use crate::prompts::repository::{PromptQuery, PromptRepository};
use crate::prompts::PromptStatus;

#[derive(Deserialize)]
pub(crate) struct ExportQuery {
    compatibility: Option<String>,
}

/// Download all published prompts (optionally tag-filtered) as the
/// versioned interchange document.
pub(crate) async fn export_prompts(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> impl IntoResponse {
    let page = state
        .prompt_repo
        .query(&PromptQuery {
            status: Some(PromptStatus::Published),
            compatibility: params.compatibility,
            search: None,
            page: 1,
            per_page: 0,
        })
        .await;

    let doc = export_records(&page.records);
    let filename = export_filename(doc.exported_at);
    tracing::info!(prompts = doc.prompts.len(), %filename, "exported prompts");

    (
        [(
            header::CONTENT_DISPOSITION.as_str(),
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(doc),
    )
}

#[derive(Deserialize)]
pub(crate) struct ImportParams {
    #[serde(default = "default_mode")]
    mode: ImportMode,
}

fn default_mode() -> ImportMode {
    ImportMode::Skip
}

/// Upload an interchange document. A document that does not parse, or
/// is missing the `prompts` list, rejects the whole batch before any
/// candidate is touched; per-candidate failures only bump the `failed`
/// counter.
pub(crate) async fn import_prompts(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, ApiError> {
    auth::require_mutation(&state, &headers)?;

    let document: ImportDocument = serde_json::from_str(&body)
        .map_err(|e| ApiError::Validation(format!("invalid import document: {e}")))?;
    tracing::info!(
        version = document.version.as_deref().unwrap_or("unspecified"),
        candidates = document.prompts.len(),
        mode = ?params.mode,
        "importing prompts"
    );

    let report =
        reconcile::import_batch(state.prompt_repo.as_ref(), document.prompts, params.mode).await;
    Ok(Json(json!({
        "imported": report.imported,
        "updated": report.updated,
        "skipped": report.skipped,
        "failed": report.failed,
    })))
}
