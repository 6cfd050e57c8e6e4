//! Conversation Stability Score result

use serde::{Deserialize, Serialize};
use crate::CSS_BASE;

/// CSS with its penalty breakdown. `css = max(0, base - Σ penalties)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssResult {
    pub css: u32,
    pub base: u32,
    pub sentence_penalty: u32,
    pub question_penalty: u32,
    pub coaching_penalty: u32,
    pub tone_drift: u32,
    pub escalation_penalty: u32,
    pub emotion_overprocessing_penalty: u32,
    pub pacing_profile_penalty: u32,
}

impl CssResult {
    /// Silence mode: full score, every component zero
    pub fn silent() -> Self {
        Self {
            css: CSS_BASE,
            base: CSS_BASE,
            sentence_penalty: 0,
            question_penalty: 0,
            coaching_penalty: 0,
            tone_drift: 0,
            escalation_penalty: 0,
            emotion_overprocessing_penalty: 0,
            pacing_profile_penalty: 0,
        }
    }

    /// Sum of all penalty components
    pub fn total_penalty(&self) -> u32 {
        self.sentence_penalty
            + self.question_penalty
            + self.coaching_penalty
            + self.tone_drift
            + self.escalation_penalty
            + self.emotion_overprocessing_penalty
            + self.pacing_profile_penalty
    }
}
