//! Silence mode decision types and reason codes

use serde::{Deserialize, Serialize};

/// Shape of the silent reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceStyle {
    ReflectOnly,
    ReflectAndPause,
    OneLineAnchor,
}

/// Which of the two per-turn passes is being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilencePass {
    /// Before generation; CSS unknown, only S000-S002 apply
    PreGeneration,
    /// After the real CSS is known; all rules apply
    PostGeneration,
}

/// Sentence library category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceCategory {
    /// For fear/shame
    Stability,
    /// For anger
    Center,
    /// For frustration
    Pause,
    /// For responsibility-tone phrasing
    Growth,
}

impl SilenceCategory {
    /// Catalog order; global sentence indices follow it
    pub const ALL: [SilenceCategory; 4] = [
        SilenceCategory::Stability,
        SilenceCategory::Center,
        SilenceCategory::Pause,
        SilenceCategory::Growth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SilenceCategory::Stability => "stability",
            SilenceCategory::Center => "center",
            SilenceCategory::Pause => "pause",
            SilenceCategory::Growth => "growth",
        }
    }
}

/// Reason codes for silence decisions, in rule priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum SilenceReason {
    /// Previous turn was silent; never two in a row
    S000_PREVIOUS_WAS_SILENCE,
    /// High risk, user needs a grounding anchor
    S001_HIGH_RISK,
    /// Short message with a high-intensity emotion
    S002_SHORT_INTENSE,
    /// Stability score too low
    S003_LOW_CSS,
    /// Previous turn asked a question
    S004_PREVIOUS_WAS_QUESTION,
    /// No rule fired
    S005_NO_CONDITION,
}

impl SilenceReason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::S000_PREVIOUS_WAS_SILENCE => "S000_PREVIOUS_WAS_SILENCE",
            Self::S001_HIGH_RISK => "S001_HIGH_RISK",
            Self::S002_SHORT_INTENSE => "S002_SHORT_INTENSE",
            Self::S003_LOW_CSS => "S003_LOW_CSS",
            Self::S004_PREVIOUS_WAS_QUESTION => "S004_PREVIOUS_WAS_QUESTION",
            Self::S005_NO_CONDITION => "S005_NO_CONDITION",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::S000_PREVIOUS_WAS_SILENCE => {
                "Previous turn was silence mode - respond normally"
            }
            Self::S001_HIGH_RISK => "High risk level - user needs grounding anchor",
            Self::S002_SHORT_INTENSE => {
                "Short message with high-intensity emotion - needs reflection space"
            }
            Self::S003_LOW_CSS => "Low stability score - use silence instead",
            Self::S004_PREVIOUS_WAS_QUESTION => {
                "Previous turn was a question - avoid asking again"
            }
            Self::S005_NO_CONDITION => "No silence conditions met",
        }
    }
}

impl std::fmt::Display for SilenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

/// Outcome of the silence rule chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilenceDecision {
    pub use_silence: bool,
    pub style: SilenceStyle,
    pub reason: SilenceReason,
    /// Library sentence to deliver when silent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_sentence: Option<String>,
}

impl SilenceDecision {
    pub fn speak(reason: SilenceReason) -> Self {
        Self {
            use_silence: false,
            style: SilenceStyle::ReflectOnly,
            reason,
            selected_sentence: None,
        }
    }

    pub fn silent(style: SilenceStyle, reason: SilenceReason) -> Self {
        Self {
            use_silence: true,
            style,
            reason,
            selected_sentence: None,
        }
    }
}

/// A sentence picked from the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSentence {
    /// Global index across the whole catalog
    pub index: usize,
    pub sentence: String,
    /// Category the pick came from; None when drawn from the union
    pub category: Option<SilenceCategory>,
    /// True when every candidate was recently used and the cycle reset
    pub cycle_reset: bool,
}
