//! Import reconciliation: decides create/update/skip per candidate
//! against the existing store, matching by slug.
//!
//! Reconciliation is best-effort per item — a candidate that fails to
//! store is tallied and logged, and the batch moves on. Only a malformed
//! document (unparseable, or missing the `prompts` list) fails the whole
//! batch, and that happens before any candidate is attempted.

use serde::{Deserialize, Serialize};

use super::PromptStatus;
use super::repository::{NewPrompt, PromptPatch, PromptRepository, StoreResult};

/// Conflict policy for candidates whose slug already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Leave the existing record untouched.
    Skip,
    /// Refresh the existing record in place.
    Update,
    /// Always create a new record under a fresh slug.
    Create,
}

/// One prompt from an uploaded document. Title, slug and content are
/// required; a document missing any of them on any candidate is
/// rejected at parse time, before the batch starts.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidatePrompt {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub compatibility: Option<Vec<String>>,
}

/// Uploaded document shape. Matches the export format; extra fields
/// (`exported_at`, per-prompt `meta`) are ignored.
#[derive(Debug, Deserialize)]
pub struct ImportDocument {
    #[serde(default)]
    pub version: Option<String>,
    pub prompts: Vec<CandidatePrompt>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Run the batch against the store. Candidates are processed in input
/// order within the calling request; there is no cross-candidate
/// transactionality.
pub async fn import_batch(
    repo: &dyn PromptRepository,
    candidates: Vec<CandidatePrompt>,
    mode: ImportMode,
) -> ImportReport {
    let mut report = ImportReport::default();

    for candidate in candidates {
        let existing = repo.find_by_slug(&candidate.slug).await;

        let target_id = match (existing, mode) {
            (Some(_), ImportMode::Skip) => {
                report.skipped += 1;
                continue;
            }
            (Some(existing), ImportMode::Update) => {
                // Only the title is refreshed here; content and tags are
                // overwritten below for every non-skip branch, and the
                // existing slug stays as it is.
                let patch = PromptPatch {
                    title: Some(candidate.title.clone()),
                    ..Default::default()
                };
                match repo.update(&existing.id, patch).await {
                    Ok(record) => {
                        report.updated += 1;
                        record.id
                    }
                    Err(e) => {
                        tracing::warn!(slug = %candidate.slug, error = %e, "import: update failed");
                        report.failed += 1;
                        continue;
                    }
                }
            }
            (Some(_), ImportMode::Create) => {
                let slug = repo.generate_unique_slug(&candidate.slug).await;
                match create_candidate(repo, &candidate, slug).await {
                    Ok(id) => {
                        report.imported += 1;
                        id
                    }
                    Err(e) => {
                        tracing::warn!(slug = %candidate.slug, error = %e, "import: create failed");
                        report.failed += 1;
                        continue;
                    }
                }
            }
            (None, _) => match create_candidate(repo, &candidate, candidate.slug.clone()).await {
                Ok(id) => {
                    report.imported += 1;
                    id
                }
                Err(e) => {
                    tracing::warn!(slug = %candidate.slug, error = %e, "import: create failed");
                    report.failed += 1;
                    continue;
                }
            },
        };

        // Content is written unconditionally for every non-skip branch,
        // recomputing the derived counts.
        let patch = PromptPatch {
            content: Some(candidate.content),
            ..Default::default()
        };
        if let Err(e) = repo.update(&target_id, patch).await {
            tracing::warn!(id = %target_id, error = %e, "import: content write failed");
            report.failed += 1;
            continue;
        }

        // Tags are a full replace, but only when the candidate actually
        // supplied some: an absent or empty `compatibility` list leaves
        // the record's existing tags alone.
        if let Some(tags) = candidate.compatibility.filter(|slugs| !slugs.is_empty()) {
            if let Err(e) = repo.set_tags(&target_id, &tags).await {
                tracing::warn!(id = %target_id, error = %e, "import: tag write failed");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        imported = report.imported,
        updated = report.updated,
        skipped = report.skipped,
        failed = report.failed,
        "import batch finished"
    );
    report
}

async fn create_candidate(
    repo: &dyn PromptRepository,
    candidate: &CandidatePrompt,
    slug: String,
) -> StoreResult<String> {
    let record = repo
        .create(NewPrompt {
            title: candidate.title.clone(),
            slug,
            status: Some(PromptStatus::Published),
            ..Default::default()
        })
        .await?;
    Ok(record.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::file_repository::FilePromptRepository;
    use crate::prompts::repository::PromptQuery;

    fn candidate(slug: &str, title: &str, content: &str) -> CandidatePrompt {
        CandidatePrompt {
            title: title.to_string(),
            slug: slug.to_string(),
            content: content.to_string(),
            compatibility: Some(vec!["claude".to_string()]),
        }
    }

    async fn seeded_repo(dir: &std::path::Path) -> FilePromptRepository {
        let repo = FilePromptRepository::new(dir);
        repo.create(NewPrompt {
            title: "Existing".to_string(),
            slug: "existing".to_string(),
            content: "original body".to_string(),
            compatibility: vec!["generic".to_string()],
            status: Some(PromptStatus::Published),
        })
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn skip_mode_leaves_existing_record_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(dir.path()).await;
        let before = repo.find_by_slug("existing").await.unwrap();

        let report = import_batch(
            &repo,
            vec![candidate("existing", "New Title", "new body")],
            ImportMode::Skip,
        )
        .await;

        assert_eq!(report.skipped, 1);
        assert_eq!(report.imported, 0);
        assert_eq!(report.updated, 0);

        let after = repo.find_by_slug("existing").await.unwrap();
        assert_eq!(after.title, before.title);
        assert_eq!(after.content, before.content);
        assert_eq!(after.compatibility, before.compatibility);
        assert_eq!(after.modified_at, before.modified_at);
    }

    #[tokio::test]
    async fn update_mode_refreshes_title_and_overwrites_content_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(dir.path()).await;

        let report = import_batch(
            &repo,
            vec![candidate("existing", "New Title", "new body")],
            ImportMode::Update,
        )
        .await;

        assert_eq!(report.updated, 1);
        assert_eq!(report.imported, 0);
        assert_eq!(report.failed, 0);

        let after = repo.find_by_slug("existing").await.unwrap();
        assert_eq!(after.title, "New Title");
        assert_eq!(after.slug, "existing");
        assert_eq!(after.content, "new body");
        assert_eq!(after.word_count, 2);
        assert_eq!(after.compatibility, vec!["claude"]);
    }

    #[tokio::test]
    async fn empty_compatibility_list_leaves_existing_tags_alone() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(dir.path()).await;

        let report = import_batch(
            &repo,
            vec![CandidatePrompt {
                title: "New Title".to_string(),
                slug: "existing".to_string(),
                content: "new body".to_string(),
                compatibility: Some(Vec::new()),
            }],
            ImportMode::Update,
        )
        .await;

        assert_eq!(report.updated, 1);
        let after = repo.find_by_slug("existing").await.unwrap();
        assert_eq!(after.content, "new body");
        assert_eq!(after.compatibility, vec!["generic"]);
    }

    #[tokio::test]
    async fn absent_compatibility_leaves_existing_tags_alone() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(dir.path()).await;

        let report = import_batch(
            &repo,
            vec![CandidatePrompt {
                title: "New Title".to_string(),
                slug: "existing".to_string(),
                content: "new body".to_string(),
                compatibility: None,
            }],
            ImportMode::Update,
        )
        .await;

        assert_eq!(report.updated, 1);
        let after = repo.find_by_slug("existing").await.unwrap();
        assert_eq!(after.compatibility, vec!["generic"]);
    }

    #[tokio::test]
    async fn create_mode_makes_a_new_record_under_a_fresh_slug() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(dir.path()).await;

        let report = import_batch(
            &repo,
            vec![candidate("existing", "Imported Copy", "copied body")],
            ImportMode::Create,
        )
        .await;

        assert_eq!(report.imported, 1);

        // original untouched
        let original = repo.find_by_slug("existing").await.unwrap();
        assert_eq!(original.title, "Existing");
        assert_eq!(original.content, "original body");

        let fresh = repo.find_by_slug("existing-2").await.unwrap();
        assert_eq!(fresh.title, "Imported Copy");
        assert_eq!(fresh.content, "copied body");
        assert_ne!(fresh.id, original.id);
    }

    #[tokio::test]
    async fn missing_slug_creates_with_candidates_own_slug() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePromptRepository::new(dir.path());

        let report = import_batch(
            &repo,
            vec![candidate("brand-new", "Brand New", "body text here")],
            ImportMode::Skip,
        )
        .await;

        assert_eq!(report.imported, 1);
        let record = repo.find_by_slug("brand-new").await.unwrap();
        assert_eq!(record.status, PromptStatus::Published);
        assert_eq!(record.word_count, 3);
    }

    #[tokio::test]
    async fn failed_candidate_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePromptRepository::new(dir.path());

        let report = import_batch(
            &repo,
            vec![
                candidate("bad", "   ", "body"), // empty title fails validation
                candidate("good", "Good", "body"),
            ],
            ImportMode::Skip,
        )
        .await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.imported, 1);
        assert!(repo.find_by_slug("good").await.is_some());
    }

    #[tokio::test]
    async fn counters_are_exact_across_a_mixed_batch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = seeded_repo(dir.path()).await;

        let report = import_batch(
            &repo,
            vec![
                candidate("existing", "Same Slug", "a"),
                candidate("new-one", "New One", "b"),
                candidate("new-two", "New Two", "c"),
            ],
            ImportMode::Skip,
        )
        .await;

        assert_eq!(
            report,
            ImportReport {
                imported: 2,
                updated: 0,
                skipped: 1,
                failed: 0
            }
        );
        let page = repo.query(&PromptQuery { per_page: 0, ..Default::default() }).await;
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn export_then_import_reproduces_the_records() {
        use crate::prompts::export::export_records;

        let dir = tempfile::tempdir().unwrap();
        let source = FilePromptRepository::new(dir.path());
        for (slug, content, tags) in [
            ("review", "review this code", vec!["claude", "chatgpt"]),
            ("write", "write a story", vec!["gemini"]),
        ] {
            source
                .create(NewPrompt {
                    title: slug.to_string(),
                    slug: slug.to_string(),
                    content: content.to_string(),
                    compatibility: tags.iter().map(|s| s.to_string()).collect(),
                    status: Some(PromptStatus::Published),
                })
                .await
                .unwrap();
        }

        let page = source
            .query(&PromptQuery { per_page: 0, ..Default::default() })
            .await;
        let doc = export_records(&page.records);
        let serialized = serde_json::to_string(&doc).unwrap();

        // re-import the serialized document into an empty store
        let dir2 = tempfile::tempdir().unwrap();
        let target = FilePromptRepository::new(dir2.path());
        let parsed: ImportDocument = serde_json::from_str(&serialized).unwrap();
        let report = import_batch(&target, parsed.prompts, ImportMode::Create).await;
        assert_eq!(report.imported, 2);
        assert_eq!(report.failed, 0);

        for (slug, content, tags) in [
            ("review", "review this code", vec!["claude", "chatgpt"]),
            ("write", "write a story", vec!["gemini"]),
        ] {
            let record = target.find_by_slug(slug).await.unwrap();
            assert_eq!(record.content, content);
            assert_eq!(record.compatibility, tags);
            assert_eq!(record.word_count, 3);
        }
    }

    #[test]
    fn document_without_prompts_list_fails_to_parse() {
        let err = serde_json::from_str::<ImportDocument>(r#"{"version": "1.0"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn candidate_missing_required_field_fails_to_parse() {
        let err = serde_json::from_str::<ImportDocument>(
            r#"{"prompts": [{"title": "No Slug", "content": "x"}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn export_shape_with_meta_is_accepted() {
        let doc: ImportDocument = serde_json::from_str(
            r#"{
                "version": "1.0",
                "exported_at": "2025-10-07T12:00:00Z",
                "prompts": [{
                    "title": "T", "slug": "t", "content": "c",
                    "compatibility": ["claude"],
                    "meta": {"character_count": 1, "word_count": 1}
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.prompts.len(), 1);
        assert_eq!(doc.prompts[0].compatibility.as_deref(), Some(&["claude".to_string()][..]));
    }
}
