use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{
    NewPrompt, PromptPatch, PromptPage, PromptQuery, PromptRepository, StoreError, StoreResult,
    slugify,
};
use super::{CompatibilityTag, PromptRecord, PromptStatus, TagWithCount, search};

/// File-backed prompt store: one JSON document per record under
/// `<base_dir>/prompts/`, the tag registry in `<base_dir>/tags.json`,
/// and an in-memory index for queries. Writes go through to disk before
/// the in-memory state is updated.
pub struct FilePromptRepository {
    base_dir: PathBuf,
    prompts: RwLock<HashMap<String, PromptRecord>>,
    tags: RwLock<Vec<CompatibilityTag>>,
}

impl FilePromptRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            prompts: RwLock::new(HashMap::new()),
            tags: RwLock::new(Vec::new()),
        }
    }

    fn prompts_dir(&self) -> PathBuf {
        self.base_dir.join("prompts")
    }

    fn tags_path(&self) -> PathBuf {
        self.base_dir.join("tags.json")
    }

    fn persist_record(&self, record: &PromptRecord) -> StoreResult<()> {
        let dir = self.prompts_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.json", record.id));
        let content =
            serde_json::to_string_pretty(record).map_err(|e| StoreError::Serde(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    fn persist_tags(&self, tags: &[CompatibilityTag]) -> StoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        let content =
            serde_json::to_string_pretty(tags).map_err(|e| StoreError::Serde(e.to_string()))?;
        std::fs::write(self.tags_path(), content)?;
        Ok(())
    }

    /// Add any slugs missing from the registry as new tags. Names are
    /// humanized from the slug ("github-copilot" -> "Github Copilot").
    async fn register_tags(&self, slugs: &[String]) -> StoreResult<()> {
        let mut tags = self.tags.write().await;
        let mut changed = false;
        for slug in slugs {
            if slug.is_empty() || tags.iter().any(|t| &t.slug == slug) {
                continue;
            }
            tags.push(CompatibilityTag {
                name: humanize_slug(slug),
                slug: slug.clone(),
            });
            changed = true;
        }
        if changed {
            self.persist_tags(&tags)?;
        }
        Ok(())
    }

    /// Unique-slug derivation against the given set of taken slugs:
    /// the base itself, then `base-2`, `base-3`, ...
    fn derive_unique_slug(base: &str, taken: &dyn Fn(&str) -> bool) -> String {
        let base = slugify(base);
        if !taken(&base) {
            return base;
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}-{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn humanize_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl PromptRepository for FilePromptRepository {
    async fn create(&self, new: NewPrompt) -> StoreResult<PromptRecord> {
        if new.title.trim().is_empty() {
            return Err(StoreError::Validation("title must not be empty".into()));
        }

        let mut prompts = self.prompts.write().await;
        let base = if new.slug.trim().is_empty() {
            slugify(&new.title)
        } else {
            slugify(&new.slug)
        };
        let slug = Self::derive_unique_slug(&base, &|candidate: &str| {
            prompts
                .values()
                .any(|r| r.status != PromptStatus::Trashed && r.slug == candidate)
        });

        let now = Utc::now();
        let mut record = PromptRecord {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            slug,
            content: String::new(),
            character_count: 0,
            word_count: 0,
            compatibility: Vec::new(),
            status: new.status.unwrap_or(PromptStatus::Draft),
            created_at: now,
            modified_at: now,
        };
        record.set_content(new.content);
        record.set_compatibility(&new.compatibility);

        self.persist_record(&record)?;
        prompts.insert(record.id.clone(), record.clone());
        drop(prompts);

        self.register_tags(&record.compatibility).await?;
        tracing::info!(id = %record.id, slug = %record.slug, "created prompt");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: PromptPatch) -> StoreResult<PromptRecord> {
        let mut prompts = self.prompts.write().await;
        let mut record = prompts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(StoreError::Validation("title must not be empty".into()));
            }
            record.title = title;
        }
        if let Some(content) = patch.content {
            record.set_content(content);
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(slugs) = &patch.compatibility {
            record.set_compatibility(slugs);
        }
        record.modified_at = Utc::now();

        self.persist_record(&record)?;
        prompts.insert(record.id.clone(), record.clone());
        drop(prompts);

        if let Some(slugs) = patch.compatibility {
            self.register_tags(&slugs).await?;
        }
        Ok(record)
    }

    async fn get(&self, id: &str) -> Option<PromptRecord> {
        self.prompts.read().await.get(id).cloned()
    }

    async fn find_by_slug(&self, slug: &str) -> Option<PromptRecord> {
        self.prompts
            .read()
            .await
            .values()
            .find(|r| r.status != PromptStatus::Trashed && r.slug == slug)
            .cloned()
    }

    async fn query(&self, query: &PromptQuery) -> PromptPage {
        let prompts = self.prompts.read().await;
        let mut records: Vec<&PromptRecord> = prompts
            .values()
            .filter(|r| r.status != PromptStatus::Trashed)
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .filter(|r| {
                query
                    .compatibility
                    .as_deref()
                    .is_none_or(|tag| r.compatibility.iter().any(|s| s == tag))
            })
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let records = match query.search.as_deref() {
            Some(term) => search::search_records(&records, term),
            None => records,
        };

        let total = records.len();
        let (records, total_pages) = if query.per_page == 0 {
            (records, 1)
        } else {
            let total_pages = total.div_ceil(query.per_page);
            let page = query.page.max(1);
            let start = (page - 1).saturating_mul(query.per_page).min(total);
            let end = (start + query.per_page).min(total);
            (records[start..end].to_vec(), total_pages)
        };

        PromptPage {
            records: records.into_iter().cloned().collect(),
            total,
            total_pages,
        }
    }

    async fn generate_unique_slug(&self, base: &str) -> String {
        let prompts = self.prompts.read().await;
        Self::derive_unique_slug(base, &|candidate: &str| {
            prompts
                .values()
                .any(|r| r.status != PromptStatus::Trashed && r.slug == candidate)
        })
    }

    async fn set_tags(&self, id: &str, slugs: &[String]) -> StoreResult<()> {
        let mut prompts = self.prompts.write().await;
        let mut record = prompts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.set_compatibility(slugs);
        record.modified_at = Utc::now();
        self.persist_record(&record)?;
        prompts.insert(record.id.clone(), record);
        drop(prompts);

        self.register_tags(slugs).await
    }

    async fn list_tags(&self) -> Vec<TagWithCount> {
        let tags = self.tags.read().await;
        let prompts = self.prompts.read().await;
        tags.iter()
            .map(|tag| TagWithCount {
                name: tag.name.clone(),
                slug: tag.slug.clone(),
                count: prompts
                    .values()
                    .filter(|r| r.status != PromptStatus::Trashed)
                    .filter(|r| r.compatibility.iter().any(|s| s == &tag.slug))
                    .count(),
            })
            .collect()
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut prompts = self.prompts.write().await;
        let Some(mut record) = prompts.get(id).cloned() else {
            return Ok(false);
        };
        record.status = PromptStatus::Trashed;
        record.modified_at = Utc::now();
        self.persist_record(&record)?;
        prompts.insert(record.id.clone(), record);
        Ok(true)
    }

    async fn load_all(&self) -> anyhow::Result<()> {
        use anyhow::Context;

        let prompts_dir = self.prompts_dir();
        std::fs::create_dir_all(&prompts_dir)
            .with_context(|| format!("failed to create prompts dir: {}", prompts_dir.display()))?;

        let mut loaded = HashMap::new();
        let entries = std::fs::read_dir(&prompts_dir)
            .with_context(|| format!("failed to read prompts dir: {}", prompts_dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read prompt file: {}", path.display()))?;
            match serde_json::from_str::<PromptRecord>(&content) {
                Ok(record) => {
                    loaded.insert(record.id.clone(), record);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping invalid prompt file");
                }
            }
        }

        let count = loaded.len();
        if count > 0 {
            tracing::info!(count, "Loaded stored prompts");
        }
        *self.prompts.write().await = loaded;

        let tags_path = self.tags_path();
        if tags_path.exists() {
            let content = std::fs::read_to_string(&tags_path)
                .with_context(|| format!("failed to read tags file: {}", tags_path.display()))?;
            match serde_json::from_str::<Vec<CompatibilityTag>>(&content) {
                Ok(tags) => *self.tags.write().await = tags,
                Err(e) => {
                    tracing::warn!(path = %tags_path.display(), error = %e, "Skipping invalid tags file");
                }
            }
        }

        Ok(())
    }
}
