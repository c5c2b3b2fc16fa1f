//! Derived-metadata calculator: character and word counts for prompt bodies.
//!
//! Pure and total — every input, including the empty string, yields counts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub character_count: usize,
    pub word_count: usize,
}

/// Compute both derived counts for a prompt body.
///
/// Characters are Unicode scalar values, not bytes. Words are maximal runs
/// of non-whitespace after markup tags have been stripped.
pub fn compute_counts(content: &str) -> Counts {
    Counts {
        character_count: content.chars().count(),
        word_count: strip_markup(content).split_whitespace().count(),
    }
}

/// Remove `<...>` markup tags. Tag bodies are dropped entirely, so
/// `a<b>c` becomes `ac`. An unterminated `<` swallows the rest of the
/// input, matching the usual tag-stripping behavior.
pub fn strip_markup(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_tag = false;
    for ch in content.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// First `max_words` words of the stripped content, with a trailing
/// ellipsis when truncated. Used for list excerpts.
pub fn trim_words(content: &str, max_words: usize) -> String {
    let stripped = strip_markup(content);
    let words: Vec<&str> = stripped.split_whitespace().collect();
    if words.len() <= max_words {
        words.join(" ")
    } else {
        let mut out = words[..max_words].join(" ");
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_counts_zero() {
        assert_eq!(
            compute_counts(""),
            Counts {
                character_count: 0,
                word_count: 0
            }
        );
    }

    #[test]
    fn whitespace_only_has_no_words() {
        let counts = compute_counts("  \n\t ");
        assert_eq!(counts.word_count, 0);
        assert_eq!(counts.character_count, 5);
    }

    #[test]
    fn character_count_is_scalar_values_not_bytes() {
        // "héllo" is 6 bytes but 5 scalar values
        assert_eq!(compute_counts("héllo").character_count, 5);
        assert_eq!(compute_counts("日本語").character_count, 3);
    }

    #[test]
    fn word_count_strips_tags_first() {
        assert_eq!(compute_counts("<b>hello</b> world").word_count, 2);
    }

    #[test]
    fn tags_join_adjacent_text() {
        // no whitespace inserted where the tag was
        assert_eq!(strip_markup("a<b>c"), "ac");
        assert_eq!(compute_counts("a<b>c").word_count, 1);
    }

    #[test]
    fn unterminated_tag_swallows_rest() {
        assert_eq!(strip_markup("hello <b world"), "hello ");
    }

    #[test]
    fn compute_counts_is_idempotent() {
        let content = "You are an <em>expert</em> reviewer.\nBe thorough.";
        assert_eq!(compute_counts(content), compute_counts(content));
    }

    #[test]
    fn trim_words_truncates_with_ellipsis() {
        assert_eq!(trim_words("one two three four", 2), "one two…");
        assert_eq!(trim_words("one two", 2), "one two");
        assert_eq!(trim_words("", 20), "");
    }
}
