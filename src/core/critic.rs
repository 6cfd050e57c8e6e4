//! Self-critic validator
//!
//! Pure function of (user text, draft, sentence cap, rules). Each rule is
//! evaluated independently; the verdict fails iff any high-severity rule
//! triggers.

use std::collections::HashSet;
use lazy_static::lazy_static;
use regex::Regex;
use crate::core::config::{RuleConfig, RulePattern};
use crate::core::text::{count_question_markers, count_sentences};
use crate::types::{CriticIssue, CriticResult, IssueKind};

lazy_static! {
    static ref RE_TOKEN_SPLIT: Regex = Regex::new(r#"[\s,.;:!?()\[\]"'`]+"#).unwrap();

    static ref RE_EN_STOPWORD: Regex = Regex::new(
        r"(?i)^(the|a|an|is|are|was|were|be|been|being|have|has|had|do|does|did|will|would|could|should|may|might|must|shall|can|need|dare|ought|used)$"
    ).unwrap();

    static ref RE_KO_STOPWORD: Regex = Regex::new(r"^(그|이|저|것|수|있|되|하|않|등|등등)$").unwrap();
}

/// Lowercased, deduplicated content words of at least two characters
pub fn core_words(text: &str) -> Vec<String> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    RE_TOKEN_SPLIT
        .split(&lowered)
        .filter(|w| w.chars().count() >= 2)
        .filter(|w| !RE_EN_STOPWORD.is_match(w))
        .filter(|w| !RE_KO_STOPWORD.is_match(w))
        .filter(|w| seen.insert(w.to_string()))
        .map(str::to_string)
        .collect()
}

/// Share of the user's core words found in the draft. None when the user
/// text is too short to judge or the draft is empty.
pub fn core_word_overlap(user_text: &str, draft: &str) -> Option<f64> {
    let words = core_words(user_text);
    let draft = draft.trim().to_lowercase();
    if words.len() < 2 || draft.is_empty() {
        return None;
    }
    let hits = words.iter().filter(|w| draft.contains(w.as_str())).count();
    Some(hits as f64 / words.len() as f64)
}

/// Self-critic bound to one turn's rules
#[derive(Debug)]
pub struct SelfCritic<'a> {
    config: &'a RuleConfig,
}

impl<'a> SelfCritic<'a> {
    pub fn new(config: &'a RuleConfig) -> Self {
        Self { config }
    }

    /// Validate a draft against the output contract
    pub fn criticize(&self, user_text: &str, draft: &str, max_sentences: usize) -> CriticResult {
        let mut issues = Vec::new();

        if let Some(ratio) = core_word_overlap(user_text, draft) {
            if ratio < self.config.thresholds.context_drift_overlap {
                issues.push(CriticIssue::new(IssueKind::ContextDrift));
            }
        }

        if count_question_markers(draft) > 1 {
            issues.push(CriticIssue::new(IssueKind::QuestionOverload));
        }

        if count_sentences(draft) > max_sentences {
            issues.push(CriticIssue::new(IssueKind::Verbosity));
        }

        let banned: Vec<String> = self
            .config
            .banned_phrases
            .iter()
            .filter(|p| !p.is_empty() && draft.contains(p.as_str()))
            .cloned()
            .collect();
        if !banned.is_empty() {
            issues.push(CriticIssue::with_matches(IssueKind::CoachTone, banned));
        }

        let persona = first_matches(&self.config.false_persona_patterns, draft);
        if !persona.is_empty() {
            issues.push(CriticIssue::with_matches(IssueKind::FalsePersona, persona));
        }

        let bonding = first_matches(&self.config.dependency_risk_patterns, draft);
        if !bonding.is_empty() {
            issues.push(CriticIssue::with_matches(IssueKind::DependencyRisk, bonding));
        }

        CriticResult::from_issues(issues)
    }
}

/// First match of each pattern that matches
fn first_matches(patterns: &[RulePattern], text: &str) -> Vec<String> {
    patterns
        .iter()
        .filter_map(|p| p.find(text))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn test_core_words_filter_and_dedupe() {
        let words = core_words("The manager was angry, the MANAGER yelled!");
        assert_eq!(words, vec!["manager", "angry", "yelled"]);
    }

    #[test]
    fn test_context_drift_skipped_for_short_user_text() {
        assert_eq!(core_word_overlap("hi", "completely unrelated"), None);
        assert_eq!(core_word_overlap("manager angry", ""), None);
    }

    #[test]
    fn test_clean_draft_passes() {
        let config = RuleConfig::default();
        let r = SelfCritic::new(&config).criticize(
            "my manager ignored my report",
            "Your manager ignored the report you worked on.",
            3,
        );
        assert!(r.pass);
        assert!(r.issues.is_empty());
        assert_eq!(r.severity, Severity::Low);
    }

    #[test]
    fn test_context_drift_flags() {
        let config = RuleConfig::default();
        let r = SelfCritic::new(&config).criticize(
            "my manager ignored my report yesterday",
            "Weather is nice.",
            3,
        );
        assert!(r.has(IssueKind::ContextDrift));
        assert!(!r.pass);
    }

    #[test]
    fn test_question_overload_and_verbosity() {
        let config = RuleConfig::default();
        let critic = SelfCritic::new(&config);
        let r = critic.criticize("", "Why? How? What.", 3);
        assert!(r.has(IssueKind::QuestionOverload));
        assert_eq!(r.severity, Severity::High);

        let r = critic.criticize("", "One. Two. Three. Four.", 3);
        assert!(r.has(IssueKind::Verbosity));
        assert!(r.pass);
        assert_eq!(r.severity, Severity::Medium);
    }

    #[test]
    fn test_coach_tone_keeps_spans() {
        let config = RuleConfig::default();
        let r = SelfCritic::new(&config).criticize("", "방향성을 먼저 잡아보죠.", 3);
        assert!(r.has(IssueKind::CoachTone));
        assert!(r.tagged()[0].contains("방향성"));
    }

    #[test]
    fn test_false_persona_and_dependency() {
        let config = RuleConfig::default();
        let critic = SelfCritic::new(&config);
        let r = critic.criticize("", "제 경험으로는 괜찮아져요.", 3);
        assert!(r.has(IssueKind::FalsePersona));
        assert!(!r.pass);

        let r = critic.criticize("", "혼자가 아니에요.", 3);
        assert!(r.has(IssueKind::DependencyRisk));
        assert!(r.pass);
        assert_eq!(r.severity, Severity::Medium);
    }
}
