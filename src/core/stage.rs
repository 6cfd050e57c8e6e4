//! Maturity stage estimator
//!
//! Pure function of (text, emotion). Scores the five stage groups, applies
//! the emotion nudges, and picks the highest score; on a tie the later
//! stage in `MaturityStage::ALL` wins.

use crate::core::patterns::{EMOTION_STAGE_NUDGES, STAGE_RULES};
use crate::types::{Emotion, MaturityStage, StageEstimate, StageScores};

/// Stage estimator
#[derive(Debug, Default)]
pub struct StageEstimator;

impl StageEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the stage with its score breakdown
    pub fn estimate(&self, text: &str, emotion: Emotion) -> StageEstimate {
        let mut scores = StageScores::default();

        if text.trim().is_empty() {
            return StageEstimate { stage: MaturityStage::Reaction, scores };
        }

        for rule in STAGE_RULES.iter() {
            scores.add(rule.stage, rule.group.score(text));
        }

        for (tag, stage, amount) in EMOTION_STAGE_NUDGES {
            if *tag == emotion {
                scores.add(*stage, *amount);
            }
        }

        if scores.max() == 0.0 {
            let stage = match emotion {
                Emotion::Anger | Emotion::Frustration => MaturityStage::Reaction,
                _ => MaturityStage::Awareness,
            };
            return StageEstimate { stage, scores };
        }

        // Later stage wins ties: keep replacing while score >= best
        let mut stage = MaturityStage::Blame;
        let mut best = scores.get(stage);
        for candidate in MaturityStage::ALL.into_iter().skip(1) {
            let score = scores.get(candidate);
            if score >= best {
                stage = candidate;
                best = score;
            }
        }

        StageEstimate { stage, scores }
    }

    /// Just the stage
    pub fn stage(&self, text: &str, emotion: Emotion) -> MaturityStage {
        self.estimate(text, emotion).stage
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_reaction() {
        let est = StageEstimator::new();
        assert_eq!(est.stage("", Emotion::Confusion), MaturityStage::Reaction);
        assert_eq!(est.stage("   ", Emotion::Elevation), MaturityStage::Reaction);
    }

    #[test]
    fn test_no_hits_defaults_by_emotion() {
        let est = StageEstimator::new();
        assert_eq!(est.stage("zzz qqq", Emotion::Confusion), MaturityStage::Awareness);
        // Anger nudges reaction to 1, so reaction wins on score
        assert_eq!(est.stage("zzz qqq", Emotion::Anger), MaturityStage::Reaction);
    }

    #[test]
    fn test_blame_language() {
        let est = StageEstimator::new();
        let e = est.estimate("It was their fault, not my fault at all", Emotion::Confusion);
        assert_eq!(e.stage, MaturityStage::Blame);
        assert!(e.scores.blame >= 2.0);
    }

    #[test]
    fn test_ownership_language() {
        let est = StageEstimator::new();
        let stage = est.stage("It is my responsibility and my choice", Emotion::Confusion);
        assert_eq!(stage, MaturityStage::Ownership);
    }

    #[test]
    fn test_fear_nudges_reaction_and_awareness_tie_goes_later() {
        let est = StageEstimator::new();
        let e = est.estimate("zzz qqq", Emotion::Fear);
        assert_eq!(e.scores.reaction, 0.5);
        assert_eq!(e.scores.awareness, 0.5);
        assert_eq!(e.stage, MaturityStage::Awareness);
    }

    #[test]
    fn test_shame_nudges_awareness() {
        let est = StageEstimator::new();
        let e = est.estimate("zzz qqq", Emotion::Shame);
        assert_eq!(e.scores.awareness, 0.5);
        assert_eq!(e.stage, MaturityStage::Awareness);
    }
}
