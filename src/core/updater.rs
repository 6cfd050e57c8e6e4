//! Turn-state updater
//!
//! Builds the partial session update written at the end of a turn. The
//! silence path touches only the question/silence flags and the silence
//! history. The spoken path also records the feeling probe, the
//! overprocessing flag, tone drift and the reflection history. Both paths
//! carry a raised dependency flag.

use crate::core::patterns::{EMOTION_PROBE, TONE_DRIFT};
use crate::core::text::has_question;
use crate::types::{DependencyCheck, RecentIndices, SessionPatch, SessionState};

/// What the final spoken text says about tone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplySignals {
    /// The reply asks how the user feels
    pub emotion_probe: bool,
    /// This reply and the previous one both probed
    pub emotion_overprocessing: bool,
    pub tone_drift: bool,
}

pub fn reply_signals(previous: &SessionState, reply: &str) -> ReplySignals {
    let emotion_probe = EMOTION_PROBE.is_match(reply);
    ReplySignals {
        emotion_probe,
        emotion_overprocessing: previous.emotion_probe && emotion_probe,
        tone_drift: TONE_DRIFT.is_match(reply),
    }
}

/// Patch after a silent turn
pub fn silence_patch(sentence: &str, silence_history: &RecentIndices) -> SessionPatch {
    SessionPatch {
        previous_was_question: Some(has_question(sentence)),
        previous_was_silence: Some(true),
        last_silence_indices: Some(silence_history.clone()),
        ..Default::default()
    }
}

/// Patch after a spoken turn
pub fn spoken_patch(
    previous: &SessionState,
    reply: &str,
    signals: &ReplySignals,
    reflection_history: &RecentIndices,
) -> SessionPatch {
    SessionPatch {
        previous_was_question: Some(has_question(reply)),
        previous_was_silence: Some(false),
        tone_drift: signals
            .tone_drift
            .then(|| previous.tone_drift.saturating_add(1)),
        emotion_probe: Some(signals.emotion_probe),
        emotion_overprocessing_flag: Some(signals.emotion_overprocessing),
        last_silence_indices: None,
        last_reflection_templates: Some(reflection_history.clone()),
        dependency_flag: None,
    }
}

/// Persist the dependency flag when this message raised it
pub fn record_dependency(patch: &mut SessionPatch, check: &DependencyCheck) {
    if check.signal {
        patch.dependency_flag = Some(check.flag);
    }
}

// =============================================================================
// TESTS
// =============================================================================
