pub mod counts;
pub mod export;
pub mod file_repository;
pub mod reconcile;
pub mod repository;
pub mod search;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStatus {
    Draft,
    Published,
    Trashed,
}

/// A stored prompt. `character_count` and `word_count` are derived from
/// `content` and only ever written through [`PromptRecord::set_content`],
/// so every save path recomputes them before the record is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub character_count: usize,
    #[serde(default)]
    pub word_count: usize,
    /// Compatibility tag slugs. Unordered set semantics, no duplicates.
    #[serde(default)]
    pub compatibility: Vec<String>,
    pub status: PromptStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl PromptRecord {
    /// The single interceptor for content writes: sets the body and
    /// recomputes both derived counts in the same step.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        let counts = counts::compute_counts(&self.content);
        self.character_count = counts.character_count;
        self.word_count = counts.word_count;
    }

    /// Replace the tag set. Input order is not preserved; duplicates are
    /// dropped.
    pub fn set_compatibility(&mut self, slugs: &[String]) {
        let mut seen = std::collections::HashSet::new();
        self.compatibility = slugs
            .iter()
            .filter(|s| !s.is_empty() && seen.insert(s.as_str()))
            .cloned()
            .collect();
    }

    pub fn excerpt(&self, max_words: usize) -> String {
        counts::trim_words(&self.content, max_words)
    }
}

/// A compatibility tag. Free-form; the conventional set (claude, chatgpt,
/// cursor, github-copilot, gemini, perplexity, generic) is a suggestion,
/// not an enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityTag {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagWithCount {
    pub name: String,
    pub slug: String,
    pub count: usize,
}
