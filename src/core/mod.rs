//! Core modules for Turnguard

pub mod text;
pub mod patterns;
pub mod config;
pub mod stage;
pub mod pacing;
pub mod library;
pub mod silence;
pub mod critic;
pub mod moves;
pub mod css;
pub mod generator;
pub mod prompts;
pub mod rewriter;
pub mod guardrail;
pub mod reflection;
pub mod store;
pub mod events;
pub mod updater;
pub mod dependency;
pub mod pipeline;
pub mod api;

pub use config::{ConfigOverrides, ConfigProvider, FileConfigProvider, RuleConfig, StaticConfig};
pub use stage::StageEstimator;
pub use pacing::select_profile;
pub use library::{random_sentence, select_silence_sentence};
pub use silence::{SilenceContext, SilenceEngine};
pub use critic::SelfCritic;
pub use moves::MoveDetector;
pub use css::{CssInputs, CssScorer};
pub use generator::{
    Classifier, FixedClassifier, GenerationKind, GenerationRequest, OfflineGenerator,
    SuppliedDraft, TextGenerator,
};
pub use rewriter::ConstrainedRewriter;
pub use guardrail::GuardrailProcessor;
pub use reflection::{reflection_category, select_reflection, Reflection, ReflectionCategory};
pub use store::{JsonFileStore, MemoryStore, SessionStore, UnavailableStore};
pub use events::{JsonlSink, MemorySink, QualityEventSink, TracingSink};
pub use dependency::check_dependency;
pub use pipeline::TurnPipeline;
pub use api::{create_router, run_server};
