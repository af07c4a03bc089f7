//! Text statistics: word and sentence counts, reading time, summary.
//!
//! Deliberately crude heuristics. Sentences are split on runs of `.`, `!`
//! and `?`, so abbreviations like "e.g." inflate the count.

use regex::Regex;
use std::sync::LazyLock;

use super::record::ReadingTime;

const ELLIPSIS: &str = "...";

// NOTE: expect() is acceptable here, the pattern is a constant
static SENTENCE_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("Invalid regex: sentence delimiters"));

/// Number of whitespace-delimited non-empty tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of pieces the text splits into around sentence delimiters.
///
/// Leading and trailing empty pieces count, so an empty text is one sentence
/// and "Hi." is two.
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_DELIMITERS.split(text).count()
}

/// Estimated reading time at `words_per_minute`.
///
/// A blank text still counts as a single (empty) word, so `minutes` is at
/// least 1.
pub fn reading_time(text: &str, words_per_minute: usize) -> ReadingTime {
    let words = word_count(text.trim()).max(1);
    let minutes = words.div_ceil(words_per_minute.max(1));
    ReadingTime { minutes, words }
}

/// First `sentences` non-blank sentences joined with ". " and terminated by
/// a period, cut to `max_chars` characters with a trailing ellipsis.
pub fn summarize(text: &str, sentences: usize, max_chars: usize) -> String {
    let picked: Vec<&str> = SENTENCE_DELIMITERS
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .take(sentences)
        .collect();

    let summary = format!("{}.", picked.join(". "));
    truncate_chars(&summary, max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
