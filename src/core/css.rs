//! Conversation Stability Score
//!
//! `css = max(0, 5 - Σ penalties)`. Penalties are independent and
//! additive. Silence mode skips scoring entirely.

use crate::core::moves::MoveDetector;
use crate::core::patterns::{ACTION_SUGGESTION, COACHING};
use crate::core::text::{count_question_markers, count_sentences, has_question};
use crate::types::{CssResult, PacingProfile};
use crate::CSS_BASE;

/// Per-user inputs that do not come from the text itself
#[derive(Debug, Clone, Default)]
pub struct CssInputs<'a> {
    /// Persisted drift counter, used as-is
    pub tone_drift: u32,
    /// This reply and the previous one both probed for feelings
    pub emotion_overprocessing: bool,
    pub profile: Option<&'a PacingProfile>,
}

/// ≤3 → 0, 4 → 1, ≥5 → 2
pub fn sentence_penalty(sentences: usize) -> u32 {
    match sentences {
        0..=3 => 0,
        4 => 1,
        _ => 2,
    }
}

/// One question is free; each extra costs one
pub fn question_penalty(questions: usize) -> u32 {
    questions.saturating_sub(1) as u32
}

pub fn escalation_penalty(moves: usize) -> u32 {
    moves.saturating_sub(1) as u32
}

/// +2 over the sentence cap, +3 for a disallowed question, +2 for a
/// disallowed action suggestion
pub fn pacing_penalty(text: &str, profile: &PacingProfile) -> u32 {
    let mut penalty = 0;
    if count_sentences(text) > profile.max_sentences {
        penalty += 2;
    }
    if !profile.allow_question && has_question(text) {
        penalty += 3;
    }
    if !profile.allow_action_suggestion && ACTION_SUGGESTION.is_match(text) {
        penalty += 2;
    }
    penalty
}

#[derive(Debug, Default)]
pub struct CssScorer {
    moves: MoveDetector,
}

impl CssScorer {
    pub fn new() -> Self {
        Self { moves: MoveDetector::new() }
    }

    /// Score final text. `silence_mode` returns the fixed stable result.
    pub fn score(&self, text: &str, inputs: &CssInputs<'_>, silence_mode: bool) -> CssResult {
        if silence_mode {
            return CssResult::silent();
        }

        let mut result = CssResult {
            css: 0,
            base: CSS_BASE,
            sentence_penalty: sentence_penalty(count_sentences(text)),
            question_penalty: question_penalty(count_question_markers(text)),
            coaching_penalty: if COACHING.is_match(text) { 2 } else { 0 },
            tone_drift: inputs.tone_drift,
            escalation_penalty: escalation_penalty(self.moves.count(text)),
            emotion_overprocessing_penalty: u32::from(inputs.emotion_overprocessing),
            pacing_profile_penalty: inputs
                .profile
                .map(|p| pacing_penalty(text, p))
                .unwrap_or(0),
        };
        result.css = CSS_BASE.saturating_sub(result.total_penalty());
        result
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pacing::select_profile;
    use crate::types::{MaturityStage, RiskLevel, Role};

    #[test]
    fn test_sentence_penalty_table() {
        assert_eq!(sentence_penalty(3), 0);
        assert_eq!(sentence_penalty(4), 1);
        assert_eq!(sentence_penalty(5), 2);
        assert_eq!(sentence_penalty(6), 2);
    }

    #[test]
    fn test_question_penalty() {
        assert_eq!(question_penalty(0), 0);
        assert_eq!(question_penalty(1), 0);
        assert_eq!(question_penalty(3), 2);
    }

    #[test]
    fn test_silence_mode_is_full_score() {
        let scorer = CssScorer::new();
        let inputs = CssInputs { tone_drift: 9, emotion_overprocessing: true, profile: None };
        let r = scorer.score("strategy? roadmap? KPI? framework?", &inputs, true);
        assert_eq!(r, CssResult::silent());
        assert_eq!(r.css, 5);
        assert_eq!(r.total_penalty(), 0);
    }

    #[test]
    fn test_clean_text_scores_five() {
        let r = CssScorer::new().score("That sounds heavy.", &CssInputs::default(), false);
        assert_eq!(r.css, 5);
    }

    #[test]
    fn test_floor_at_zero() {
        let inputs = CssInputs { tone_drift: 10, ..Default::default() };
        let r = CssScorer::new().score("ok.", &inputs, false);
        assert_eq!(r.css, 0);
        assert_eq!(r.tone_drift, 10);
    }

    #[test]
    fn test_coaching_and_overprocessing() {
        let inputs = CssInputs { emotion_overprocessing: true, ..Default::default() };
        let r = CssScorer::new().score("Let's set a roadmap.", &inputs, false);
        assert_eq!(r.coaching_penalty, 2);
        assert_eq!(r.emotion_overprocessing_penalty, 1);
        assert_eq!(r.css, 2);
    }

    #[test]
    fn test_pacing_penalties_add_up() {
        let profile = select_profile(MaturityStage::Reaction, Role::Staff, RiskLevel::High);
        let text = "One. Two. Three, is the next step clear?";
        // 3 sentences > 2, a question, an action suggestion
        assert_eq!(pacing_penalty(text, &profile), 2 + 3 + 2);
    }
}
