//! Turn request and outcome

use serde::{Deserialize, Serialize};
use super::{
    Classification, CriticResult, CssResult, DependencyCheck, PacingProfile, Role, Route,
    SilenceDecision, StageEstimate,
};

/// Length bucket of the user's message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnLength {
    Short,
    Medium,
    Long,
}

/// One incoming user turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub user_id: String,
    pub text: String,
    pub role: Role,
    #[serde(default)]
    pub route: Route,
}

impl TurnRequest {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            role,
            route: Route::default(),
        }
    }
}

/// Which way the turn left the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPath {
    /// Silenced before any generation
    EarlySilence,
    /// Draft generated, then silenced by the post-generation check
    LateSilence,
    /// Generated text delivered
    Spoken,
}

impl TurnPath {
    pub fn is_silent(&self) -> bool {
        !matches!(self, TurnPath::Spoken)
    }
}

/// How the constrained rewriter resolved a failing draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteResolution {
    /// Rewritten text passed the critic
    Rewritten,
    /// Rewrite still failed; a library sentence replaced it
    LibraryFallback,
}

/// Result of one rewriter run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    pub text: String,
    pub resolution: RewriteResolution,
    /// Persona substitution ran before the external call
    pub persona_sanitized: bool,
    /// The external rewrite call failed or timed out
    pub rewrite_call_failed: bool,
    pub final_critic: CriticResult,
}

/// One guardrail step that changed the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailAction {
    QuestionCompressed,
    QuestionTrimmed,
    LengthCompressed,
    Truncated,
    BannedPhrasesRemoved,
    MovesReduced,
}

/// Guardrail output with the steps that fired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailOutcome {
    pub text: String,
    pub actions: Vec<GuardrailAction>,
}

impl GuardrailOutcome {
    pub fn untouched(text: impl Into<String>) -> Self {
        Self { text: text.into(), actions: Vec::new() }
    }
}

/// Everything a turn produced
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub path: TurnPath,
    pub classification: Classification,
    pub stage: StageEstimate,
    pub pacing: PacingProfile,
    /// The decision that determined the path
    pub silence: SilenceDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critic: Option<CriticResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<RewriteOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardrail: Option<GuardrailOutcome>,
    pub css: CssResult,
    pub dependency: DependencyCheck,
}
