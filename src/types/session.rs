//! Per-user session state carried between turns

use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most-recent-last history of used indices with FIFO eviction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentIndices(VecDeque<usize>);

impl RecentIndices {
    pub fn new() -> Self {
        Self(VecDeque::new())
    }

    pub fn from_slice(items: &[usize]) -> Self {
        Self(items.iter().copied().collect())
    }

    /// Push a value, evicting the oldest entries beyond `capacity`
    pub fn push(&mut self, value: usize, capacity: usize) {
        self.0.push_back(value);
        self.clamp(capacity);
    }

    /// Drop the oldest entries beyond `capacity`
    pub fn clamp(&mut self, capacity: usize) {
        while self.0.len() > capacity {
            self.0.pop_front();
        }
    }

    pub fn contains(&self, value: usize) -> bool {
        self.0.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.back().copied()
    }
}

/// Session state for one user. `Default` is the conservative all-false/zero/empty state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub previous_was_question: bool,
    pub previous_was_silence: bool,
    /// Drift counter; only grows here
    pub tone_drift: u32,
    /// Previous reply probed for feelings
    pub emotion_probe: bool,
    pub emotion_overprocessing_flag: bool,
    /// Global silence-library indices, capacity 3
    pub last_silence_indices: RecentIndices,
    /// Reflection template indices, capacity 5
    pub last_reflection_templates: RecentIndices,
    /// Messages showing dependency signals, capped at 10
    pub dependency_flag: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Cut stored histories down to their ring capacities (newest kept)
    pub fn clamp_histories(&mut self) {
        self.last_silence_indices.clamp(crate::SILENCE_HISTORY_CAPACITY);
        self.last_reflection_templates.clamp(crate::REFLECTION_HISTORY_CAPACITY);
    }

    /// Field-merge a patch; absent fields keep their current value
    pub fn apply(&mut self, patch: &SessionPatch) {
        if let Some(v) = patch.previous_was_question {
            self.previous_was_question = v;
        }
        if let Some(v) = patch.previous_was_silence {
            self.previous_was_silence = v;
        }
        if let Some(v) = patch.tone_drift {
            self.tone_drift = v;
        }
        if let Some(v) = patch.emotion_probe {
            self.emotion_probe = v;
        }
        if let Some(v) = patch.emotion_overprocessing_flag {
            self.emotion_overprocessing_flag = v;
        }
        if let Some(ref v) = patch.last_silence_indices {
            self.last_silence_indices = v.clone();
        }
        if let Some(ref v) = patch.last_reflection_templates {
            self.last_reflection_templates = v.clone();
        }
        if let Some(v) = patch.dependency_flag {
            self.dependency_flag = v;
        }
    }
}

/// Partial update written at turn end
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_was_question: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_was_silence: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_drift: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_probe: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_overprocessing_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_silence_indices: Option<RecentIndices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reflection_templates: Option<RecentIndices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_flag: Option<u32>,
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        *self == SessionPatch::default()
    }
}
