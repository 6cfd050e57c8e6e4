//! Turnguard: output-contract enforcement for guided-reflection chat turns
//!
//! Sits between a generative model and the user. Every delivered turn passes
//! through: stage estimate → pacing profile → silence check → draft →
//! self-critic → constrained rewrite → guardrails → stability score →
//! late silence check → session state update.

pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// CONVERSATION STABILITY SCORE
// =============================================================================

/// CSS starts here and only goes down
pub const CSS_BASE: u32 = 5;

/// CSS assumed for the pre-generation silence pass
pub const CSS_ASSUMED_BEFORE_GENERATION: u32 = 5;

/// CSS at or below this triggers silence on the post-generation pass
pub const CSS_SILENCE_THRESHOLD: u32 = 2;

/// CSS at or below this emits a quality event
pub const CSS_QUALITY_EVENT_THRESHOLD: u32 = 3;

// =============================================================================
// GUARDRAIL CAPS
// =============================================================================

/// Texts longer than this (chars) are compressed even with ≤1 question
pub const GUARDRAIL_COMPRESS_TRIGGER_CHARS: usize = 320;

/// Ellipsis appended by deterministic truncation
pub const TRUNCATION_ELLIPSIS: &str = "...";

// =============================================================================
// SESSION HISTORY
// =============================================================================

/// Silence sentence indices remembered per user
pub const SILENCE_HISTORY_CAPACITY: usize = 3;

/// Reflection sentences remembered per user
pub const REFLECTION_HISTORY_CAPACITY: usize = 5;

// =============================================================================
// DEPENDENCY TRACKING
// =============================================================================

/// Flag level from which drafts are steered toward real-world support
pub const DEPENDENCY_THRESHOLD: u32 = 3;

/// Upper bound of the per-user dependency flag
pub const DEPENDENCY_FLAG_CAP: u32 = 10;

// =============================================================================
// EXTERNAL CALLS
// =============================================================================

/// Default per-call timeout for classifier and generator calls (milliseconds)
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 8000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";

/// Version of the built-in pattern rulesets and sentence library
pub const RULESET_VERSION: &str = "2025.1";
