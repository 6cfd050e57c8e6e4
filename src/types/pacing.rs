//! Pacing profile: per-turn output constraints

use serde::{Deserialize, Serialize};

/// How a question may be asked, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStyle {
    None,
    OneShort,
    OfferTwoChoices,
}

/// Topical angle the reply may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lens {
    Emotion,
    Meaning,
    Perspective,
    Ownership,
    Alignment,
}

/// Output constraints for one turn. Built by lookup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingProfile {
    pub max_sentences: usize,
    pub allow_question: bool,
    pub question_style: QuestionStyle,
    pub allow_action_suggestion: bool,
    pub allowed_lens: Vec<Lens>,
}

impl PacingProfile {
    pub fn allows_lens(&self, lens: Lens) -> bool {
        self.allowed_lens.contains(&lens)
    }
}
