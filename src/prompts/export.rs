//! Export serializer: projects stored prompts into the versioned
//! interchange document. The projection is pure; any filtering (tag,
//! status) happens in the caller's query before records reach here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PromptRecord;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub prompts: Vec<ExportedPrompt>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedPrompt {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub compatibility: Vec<String>,
    pub meta: ExportedMeta,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedMeta {
    pub character_count: usize,
    pub word_count: usize,
}

/// Point-in-time snapshot of `records`, preserving their order.
pub fn export_records(records: &[PromptRecord]) -> ExportDocument {
    ExportDocument {
        version: EXPORT_VERSION.to_string(),
        exported_at: Utc::now(),
        prompts: records
            .iter()
            .map(|record| ExportedPrompt {
                title: record.title.clone(),
                slug: record.slug.clone(),
                content: record.content.clone(),
                compatibility: record.compatibility.clone(),
                meta: ExportedMeta {
                    character_count: record.character_count,
                    word_count: record.word_count,
                },
            })
            .collect(),
    }
}

/// Download filename embedding a UTC timestamp, e.g.
/// `prompts-export-2025-10-07-120000.json`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("prompts-export-{}.json", now.format("%Y-%m-%d-%H%M%S"))
}
