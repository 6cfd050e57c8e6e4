//! Text utilities shared by the rule components
//!
//! All lengths count Unicode scalar values, never bytes.

use lazy_static::lazy_static;
use regex::Regex;
use crate::types::TurnLength;
use crate::TRUNCATION_ELLIPSIS;

lazy_static! {
    /// Sentence-final punctuation plus Korean sentence-final endings
    static ref RE_SENTENCE_END: Regex = Regex::new(
        r"[.!?。！？]\s*|다\s+|요\s+|지\s+|네\s+|게\s+|까\s+"
    ).unwrap();

    static ref RE_LINE_BREAKS: Regex = Regex::new(r"\n+").unwrap();

    /// Question marker or Korean interrogative ending
    static ref RE_HAS_QUESTION: Regex = Regex::new(
        r"[?？]|까요|나요|인가요|을까요"
    ).unwrap();

    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Count sentences. Empty text has zero; text with no recognizable
/// segment counts its non-blank line blocks, at least one.
pub fn count_sentences(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }

    let segments = RE_SENTENCE_END
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();

    if segments == 0 {
        let blocks = RE_LINE_BREAKS
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count();
        return blocks.max(1);
    }

    segments
}

pub fn is_question_marker(c: char) -> bool {
    c == '?' || c == '？'
}

/// Number of `?`/`？` markers
pub fn count_question_markers(text: &str) -> usize {
    text.chars().filter(|c| is_question_marker(*c)).count()
}

/// True for a question marker or a Korean interrogative ending
pub fn has_question(text: &str) -> bool {
    RE_HAS_QUESTION.is_match(text)
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Bucket the user's message: short if ≤30 chars or ≤5 words,
/// medium if ≤150 chars or ≤30 words, else long.
pub fn turn_length(text: &str) -> TurnLength {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return TurnLength::Short;
    }

    let chars = char_len(trimmed);
    let words = trimmed.split_whitespace().count();

    if chars <= 30 || words <= 5 {
        TurnLength::Short
    } else if chars <= 150 || words <= 30 {
        TurnLength::Medium
    } else {
        TurnLength::Long
    }
}

/// Cut to `max_chars` total, ellipsis included. Text already within the
/// cap is returned as is.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(char_len(TRUNCATION_ELLIPSIS));
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(TRUNCATION_ELLIPSIS);
    out
}

/// Collapse whitespace runs to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

// =============================================================================
// TESTS
// =============================================================================
