//! Core types for turnguard

mod classification;
mod stage;
mod pacing;
mod critic;
mod silence;
mod css;
mod session;
mod dependency;
mod event;
mod turn;

pub use classification::{
    Classification, Emotion, EmotionReading, Intent, IntentKind, QuestionPreference, RiskLevel,
    Role, UserEnergy,
};
pub use stage::{MaturityStage, StageEstimate, StageScores};
pub use pacing::{Lens, PacingProfile, QuestionStyle};
pub use critic::{CriticIssue, CriticResult, IssueKind, Severity};
pub use silence::{
    SelectedSentence, SilenceCategory, SilenceDecision, SilencePass, SilenceReason, SilenceStyle,
};
pub use css::CssResult;
pub use session::{RecentIndices, SessionPatch, SessionState};
pub use dependency::{DependencyCheck, DependencyLevel};
pub use event::{QualityEvent, Route, LOW_CSS_SIGNATURE};
pub use turn::{
    GuardrailAction, GuardrailOutcome, RewriteOutcome, RewriteResolution, TurnLength, TurnOutcome,
    TurnPath, TurnRequest,
};
