//! Search augmentation: keyword search over prompts matches the native
//! title field and, additionally, the prompt body as a case-insensitive
//! substring. A record satisfying both predicates must still appear
//! exactly once, so results are deduplicated by id.

use std::collections::HashSet;

use super::PromptRecord;

/// Filter `records` down to those matching `term`. An empty or
/// whitespace-only term is a pass-through no-op. Input order is kept;
/// each record appears at most once regardless of how many predicates
/// it satisfied.
pub fn search_records<'a>(records: &[&'a PromptRecord], term: &str) -> Vec<&'a PromptRecord> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| title_matches(r, &needle) || content_matches(r, &needle))
        .filter(|r| seen.insert(r.id.as_str()))
        .copied()
        .collect()
}

fn title_matches(record: &PromptRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
}

fn content_matches(record: &PromptRecord, needle: &str) -> bool {
    record.content.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::prompts::PromptStatus;

    fn record(id: &str, title: &str, content: &str) -> PromptRecord {
        let now = Utc::now();
        let mut r = PromptRecord {
            id: id.to_string(),
            title: title.to_string(),
            slug: id.to_string(),
            content: String::new(),
            character_count: 0,
            word_count: 0,
            compatibility: Vec::new(),
            status: PromptStatus::Published,
            created_at: now,
            modified_at: now,
        };
        r.set_content(content);
        r
    }

    #[test]
    fn empty_term_is_passthrough() {
        let a = record("a", "Alpha", "body");
        let b = record("b", "Beta", "body");
        let records = vec![&a, &b];
        assert_eq!(search_records(&records, "").len(), 2);
        assert_eq!(search_records(&records, "   ").len(), 2);
    }

    #[test]
    fn content_only_match_is_found() {
        let a = record("a", "Untitled", "review the following code");
        let records = vec![&a];
        let hits = search_records(&records, "review");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[test]
    fn match_on_both_predicates_appears_once() {
        let a = record("a", "Code review", "review the following code");
        let records = vec![&a];
        assert_eq!(search_records(&records, "review").len(), 1);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let a = record("a", "Code Review", "");
        let b = record("b", "other", "REVIEW this");
        let records = vec![&a, &b];
        assert_eq!(search_records(&records, "ReViEw").len(), 2);
    }

    #[test]
    fn non_matching_records_are_dropped_in_order() {
        let a = record("a", "Alpha", "nothing here");
        let b = record("b", "Beta", "the needle is here");
        let c = record("c", "needle in title", "");
        let records = vec![&a, &b, &c];
        let hits = search_records(&records, "needle");
        let ids: Vec<&str> = hits.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
