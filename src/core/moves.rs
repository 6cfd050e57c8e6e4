//! Move detector
//!
//! A "move" is one of five conversational steps (emotional clarification,
//! fact vs interpretation, responsibility, perspective, action). The CSS
//! escalation penalty and the guardrail move reduction both read this one
//! detector.

use crate::core::patterns::MOVE_GROUPS;

#[derive(Debug, Default, Clone, Copy)]
pub struct MoveDetector;

impl MoveDetector {
    pub fn new() -> Self {
        Self
    }

    /// Names of the distinct moves present, in group order
    pub fn moves(&self, text: &str) -> Vec<&'static str> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        MOVE_GROUPS
            .iter()
            .filter(|g| g.is_match(text))
            .map(|g| g.name)
            .collect()
    }

    pub fn count(&self, text: &str) -> usize {
        self.moves(text).len()
    }
}
