use async_trait::async_trait;

use super::{PromptRecord, PromptStatus, TagWithCount};

/// Errors from the prompt store.
///
/// IO and serialization failures surface as 500s at the API boundary;
/// `NotFound` maps to a structured 404 and `Validation` to a 400.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("prompt not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization: {0}")]
    Serde(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields for a new record. When `slug` is empty it is derived from the
/// title; either way the stored slug is made unique among non-trashed
/// records.
#[derive(Debug, Clone, Default)]
pub struct NewPrompt {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub compatibility: Vec<String>,
    pub status: Option<PromptStatus>,
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PromptPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<PromptStatus>,
    pub compatibility: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct PromptQuery {
    pub status: Option<PromptStatus>,
    /// Tag-slug filter.
    pub compatibility: Option<String>,
    /// Free-text search term; matching is augmented per [`super::search`].
    pub search: Option<String>,
    /// 1-based page. Ignored when `per_page` is 0.
    pub page: usize,
    /// Page size; 0 disables pagination (used by export).
    pub per_page: usize,
}

impl Default for PromptQuery {
    fn default() -> Self {
        Self {
            status: Some(PromptStatus::Published),
            compatibility: None,
            search: None,
            page: 1,
            per_page: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptPage {
    pub records: Vec<PromptRecord>,
    pub total: usize,
    pub total_pages: usize,
}

/// The content store the rest of the system writes through.
///
/// Implementations must route every content write through
/// [`PromptRecord::set_content`] so the derived counts are recomputed
/// before the write is acknowledged, no matter which entry point
/// performed it.
#[async_trait]
pub trait PromptRepository: Send + Sync {
    async fn create(&self, new: NewPrompt) -> StoreResult<PromptRecord>;
    async fn update(&self, id: &str, patch: PromptPatch) -> StoreResult<PromptRecord>;
    async fn get(&self, id: &str) -> Option<PromptRecord>;

    /// Exact slug lookup among non-trashed records.
    async fn find_by_slug(&self, slug: &str) -> Option<PromptRecord>;

    async fn query(&self, query: &PromptQuery) -> PromptPage;

    /// A slug derived from `base` that collides with no existing
    /// non-trashed slug.
    async fn generate_unique_slug(&self, base: &str) -> String;

    /// Full replace of a record's tag set. Unknown slugs are registered
    /// as new tags.
    async fn set_tags(&self, id: &str, slugs: &[String]) -> StoreResult<()>;

    /// All registered tags with their usage counts over non-trashed
    /// records.
    async fn list_tags(&self) -> Vec<TagWithCount>;

    /// Soft delete. Returns false when the id does not exist.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    async fn load_all(&self) -> anyhow::Result<()>;
}

/// Lowercase, URL-safe slug from arbitrary text. Non-alphanumeric runs
/// collapse to a single hyphen.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_hyphen = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            out.push('-');
            last_hyphen = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() { "prompt".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Code Review  Helper!"), "code-review-helper");
        assert_eq!(slugify("  --already-slugged--  "), "already-slugged");
    }

    #[test]
    fn slugify_never_returns_empty() {
        assert_eq!(slugify("!!!"), "prompt");
        assert_eq!(slugify(""), "prompt");
    }
}
