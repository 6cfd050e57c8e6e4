//! Guardrail post-processor
//!
//! Independent safety net over the final spoken text, in fixed order:
//!   1. more than one question  → compress (≤2 sentences, one question)
//!   2. over 320 chars          → compress to the char cap
//!   3. banned phrase present   → remove it, collapse whitespace
//!   4. two or more moves       → reduce to one move
//! Compression failures fall through to deterministic truncation. Text
//! that trips no rule is returned byte-for-byte unchanged.

use std::time::Duration;
use tracing::warn;
use crate::core::config::RuleConfig;
use crate::core::generator::{generate_with_timeout, TextGenerator};
use crate::core::moves::MoveDetector;
use crate::core::prompts::{compress_request, reduce_moves_request, CompressTarget};
use crate::core::text::{
    char_len, collapse_whitespace, count_question_markers, is_question_marker,
    truncate_with_ellipsis,
};
use crate::types::{GuardrailAction, GuardrailOutcome};
use crate::GUARDRAIL_COMPRESS_TRIGGER_CHARS;

/// Keep text through the first question marker plus the next fragment up
/// to a period, then enforce the char cap.
pub fn trim_to_first_question(text: &str, max_chars: usize) -> String {
    let mut out = match text.find(is_question_marker) {
        Some(pos) => {
            let marker_len = text[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
            let (head, tail) = text.split_at(pos + marker_len);
            let next = tail.split(is_question_marker).next().unwrap_or("");
            let fragment = next.split('.').next().unwrap_or("").trim();
            if fragment.is_empty() {
                head.to_string()
            } else {
                format!("{} {}.", head, fragment)
            }
        }
        None => text.to_string(),
    };
    if char_len(&out) > max_chars {
        out = truncate_with_ellipsis(&out, max_chars);
    }
    out
}

/// Remove banned substrings. Returns None when none were present.
pub fn remove_banned_phrases(text: &str, banned: &[String]) -> Option<String> {
    let mut out = text.to_string();
    let mut removed = false;
    for phrase in banned.iter().filter(|p| !p.is_empty()) {
        if out.contains(phrase.as_str()) {
            out = collapse_whitespace(&out.replace(phrase.as_str(), ""));
            removed = true;
        }
    }
    removed.then_some(out)
}

pub struct GuardrailProcessor<'a> {
    config: &'a RuleConfig,
    generator: &'a dyn TextGenerator,
    moves: MoveDetector,
    call_timeout: Duration,
}

impl<'a> GuardrailProcessor<'a> {
    pub fn new(config: &'a RuleConfig, generator: &'a dyn TextGenerator, call_timeout: Duration) -> Self {
        Self {
            config,
            generator,
            moves: MoveDetector::new(),
            call_timeout,
        }
    }

    pub async fn apply(&self, text: &str) -> GuardrailOutcome {
        if text.trim().is_empty() {
            return GuardrailOutcome::untouched(text);
        }

        let max_chars = self.config.thresholds.max_chars;
        let mut result = text.to_string();
        let mut actions = Vec::new();

        // 1. question overload
        if count_question_markers(&result) > self.config.thresholds.max_questions {
            let request = compress_request(&result, CompressTarget::OneQuestion, self.config);
            match self.call(&request).await {
                Some(compressed) => {
                    actions.push(GuardrailAction::QuestionCompressed);
                    result = compressed;
                    if char_len(&result) > max_chars {
                        result = self
                            .compress_or_truncate(
                                &result,
                                CompressTarget::CharCapOneQuestion(max_chars),
                                &mut actions,
                            )
                            .await;
                    }
                }
                None => {
                    actions.push(GuardrailAction::QuestionTrimmed);
                    result = trim_to_first_question(&result, max_chars);
                }
            }
        }

        // 2. length
        if char_len(&result) > GUARDRAIL_COMPRESS_TRIGGER_CHARS {
            actions.push(GuardrailAction::LengthCompressed);
            result = self
                .compress_or_truncate(&result, CompressTarget::CharCap(max_chars), &mut actions)
                .await;
        }

        // 3. banned phrases
        if let Some(cleaned) = remove_banned_phrases(&result, &self.config.banned_phrases) {
            actions.push(GuardrailAction::BannedPhrasesRemoved);
            result = cleaned;
        }

        // 4. moves
        if self.moves.count(&result) >= 2 {
            let request = reduce_moves_request(&result, self.config);
            if let Some(reduced) = self.call(&request).await {
                actions.push(GuardrailAction::MovesReduced);
                result = reduced;
            }
        }

        if actions.is_empty() {
            return GuardrailOutcome::untouched(text);
        }
        GuardrailOutcome { text: result.trim().to_string(), actions }
    }

    /// One compression attempt; a failed or still-too-long result is truncated
    async fn compress_or_truncate(
        &self,
        text: &str,
        target: CompressTarget,
        actions: &mut Vec<GuardrailAction>,
    ) -> String {
        let max_chars = self.config.thresholds.max_chars;
        let request = compress_request(text, target, self.config);
        match self.call(&request).await {
            Some(compressed) if char_len(&compressed) <= max_chars => compressed,
            _ => {
                actions.push(GuardrailAction::Truncated);
                truncate_with_ellipsis(text, max_chars)
            }
        }
    }

    async fn call(&self, request: &crate::core::generator::GenerationRequest) -> Option<String> {
        match generate_with_timeout(self.generator, request, self.call_timeout).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(kind = ?request.kind, error = %e, "guardrail call failed, using fallback");
                None
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
