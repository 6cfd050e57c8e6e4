//! Maturity stage definitions

use serde::{Deserialize, Serialize};

/// How self-responsible the user's language currently sounds
///
/// Declaration order doubles as the tie-break order: on equal scores the
/// later stage wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityStage {
    Blame,
    Reaction,
    Awareness,
    Ownership,
    Alignment,
}

impl MaturityStage {
    /// All stages in tie-break order
    pub const ALL: [MaturityStage; 5] = [
        MaturityStage::Blame,
        MaturityStage::Reaction,
        MaturityStage::Awareness,
        MaturityStage::Ownership,
        MaturityStage::Alignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaturityStage::Blame => "blame",
            MaturityStage::Reaction => "reaction",
            MaturityStage::Awareness => "awareness",
            MaturityStage::Ownership => "ownership",
            MaturityStage::Alignment => "alignment",
        }
    }

    /// Parse a stage label; unknown labels yield None
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

impl std::fmt::Display for MaturityStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-stage scores behind an estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageScores {
    pub blame: f64,
    pub reaction: f64,
    pub awareness: f64,
    pub ownership: f64,
    pub alignment: f64,
}

impl StageScores {
    pub fn get(&self, stage: MaturityStage) -> f64 {
        match stage {
            MaturityStage::Blame => self.blame,
            MaturityStage::Reaction => self.reaction,
            MaturityStage::Awareness => self.awareness,
            MaturityStage::Ownership => self.ownership,
            MaturityStage::Alignment => self.alignment,
        }
    }

    pub fn add(&mut self, stage: MaturityStage, amount: f64) {
        match stage {
            MaturityStage::Blame => self.blame += amount,
            MaturityStage::Reaction => self.reaction += amount,
            MaturityStage::Awareness => self.awareness += amount,
            MaturityStage::Ownership => self.ownership += amount,
            MaturityStage::Alignment => self.alignment += amount,
        }
    }

    pub fn max(&self) -> f64 {
        MaturityStage::ALL
            .iter()
            .map(|s| self.get(*s))
            .fold(0.0, f64::max)
    }
}

/// Stage estimate with its score breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEstimate {
    pub stage: MaturityStage,
    pub scores: StageScores,
}
