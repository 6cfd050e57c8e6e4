//! Silence decision engine
//!
//! First-match-wins rule chain:
//!   S000 previous turn silent   → speak (absolute gate)
//!   S001 high risk              → one_line_anchor
//!   S002 short + intense emotion→ reflect_and_pause
//!   S003 CSS ≤ 2                → reflect_only   (post-generation only)
//!   S004 previous was question  → reflect_only   (post-generation only)
//!   S005 otherwise              → speak

use rand::Rng;
use tracing::debug;
use crate::core::library::select_silence_sentence;
use crate::core::text::turn_length;
use crate::types::{
    Emotion, RecentIndices, RiskLevel, SelectedSentence, SilenceDecision, SilencePass,
    SilenceReason, SilenceStyle, TurnLength,
};
use crate::{CSS_ASSUMED_BEFORE_GENERATION, CSS_SILENCE_THRESHOLD};

/// Inputs to one silence evaluation
#[derive(Debug, Clone)]
pub struct SilenceContext<'a> {
    pub user_text: &'a str,
    pub emotion: Emotion,
    pub risk: RiskLevel,
    pub turn_length: TurnLength,
    pub css_score: u32,
    pub previous_was_question: bool,
    pub previous_was_silence: bool,
}

impl<'a> SilenceContext<'a> {
    /// Context for the pre-generation pass (CSS assumed stable)
    pub fn before_generation(
        user_text: &'a str,
        emotion: Emotion,
        risk: RiskLevel,
        previous_was_question: bool,
        previous_was_silence: bool,
    ) -> Self {
        Self {
            user_text,
            emotion,
            risk,
            turn_length: turn_length(user_text),
            css_score: CSS_ASSUMED_BEFORE_GENERATION,
            previous_was_question,
            previous_was_silence,
        }
    }

    /// Same context with the real CSS filled in
    pub fn with_css(&self, css_score: u32) -> Self {
        Self { css_score, ..self.clone() }
    }
}

/// Silence decision engine
#[derive(Debug, Default)]
pub struct SilenceEngine;

impl SilenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run the rule chain without picking a sentence
    pub fn evaluate(&self, ctx: &SilenceContext<'_>, pass: SilencePass) -> SilenceDecision {
        if ctx.previous_was_silence {
            return SilenceDecision::speak(SilenceReason::S000_PREVIOUS_WAS_SILENCE);
        }

        if ctx.risk == RiskLevel::High {
            return SilenceDecision::silent(
                SilenceStyle::OneLineAnchor,
                SilenceReason::S001_HIGH_RISK,
            );
        }

        if ctx.turn_length == TurnLength::Short && ctx.emotion.is_high_intensity() {
            return SilenceDecision::silent(
                SilenceStyle::ReflectAndPause,
                SilenceReason::S002_SHORT_INTENSE,
            );
        }

        if pass == SilencePass::PostGeneration {
            if ctx.css_score <= CSS_SILENCE_THRESHOLD {
                return SilenceDecision::silent(
                    SilenceStyle::ReflectOnly,
                    SilenceReason::S003_LOW_CSS,
                );
            }

            if ctx.previous_was_question {
                return SilenceDecision::silent(
                    SilenceStyle::ReflectOnly,
                    SilenceReason::S004_PREVIOUS_WAS_QUESTION,
                );
            }
        }

        SilenceDecision::speak(SilenceReason::S005_NO_CONDITION)
    }

    /// Run the rule chain; when silent, pick the sentence and record it in `history`
    pub fn decide<R: Rng + ?Sized>(
        &self,
        ctx: &SilenceContext<'_>,
        pass: SilencePass,
        history: &mut RecentIndices,
        rng: &mut R,
    ) -> (SilenceDecision, Option<SelectedSentence>) {
        let mut decision = self.evaluate(ctx, pass);

        debug!(
            pass = ?pass,
            reason = decision.reason.code(),
            use_silence = decision.use_silence,
            "silence decision"
        );

        if !decision.use_silence {
            return (decision, None);
        }

        let picked = select_silence_sentence(ctx.user_text, ctx.emotion, history, rng);
        decision.selected_sentence = Some(picked.sentence.clone());
        (decision, Some(picked))
    }
}

// =============================================================================
// TESTS
// =============================================================================
