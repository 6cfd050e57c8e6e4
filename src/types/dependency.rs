//! User-side dependency tracking result

use serde::{Deserialize, Serialize};
use crate::DEPENDENCY_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyLevel {
    Low,
    Medium,
    High,
}

impl DependencyLevel {
    pub fn from_flag(flag: u32) -> Self {
        if flag >= DEPENDENCY_THRESHOLD {
            DependencyLevel::High
        } else if flag >= 2 {
            DependencyLevel::Medium
        } else {
            DependencyLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyLevel::Low => "low",
            DependencyLevel::Medium => "medium",
            DependencyLevel::High => "high",
        }
    }
}

/// Flag after this turn's message, and the draft adjustments it implies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyCheck {
    pub level: DependencyLevel,
    pub flag: u32,
    /// This message matched a dependency signal
    pub signal: bool,
    pub reduce_warmth: bool,
    pub increase_redirection: bool,
}

impl DependencyCheck {
    pub fn from_flag(flag: u32, signal: bool) -> Self {
        let high = flag >= DEPENDENCY_THRESHOLD;
        Self {
            level: DependencyLevel::from_flag(flag),
            flag,
            signal,
            reduce_warmth: high,
            increase_redirection: high,
        }
    }
}

impl Default for DependencyCheck {
    fn default() -> Self {
        Self::from_flag(0, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_by_flag() {
        assert_eq!(DependencyLevel::from_flag(0), DependencyLevel::Low);
        assert_eq!(DependencyLevel::from_flag(1), DependencyLevel::Low);
        assert_eq!(DependencyLevel::from_flag(2), DependencyLevel::Medium);
        assert_eq!(DependencyLevel::from_flag(3), DependencyLevel::High);
        assert_eq!(DependencyLevel::from_flag(10), DependencyLevel::High);
    }

    #[test]
    fn test_adjustments_start_at_threshold() {
        assert!(!DependencyCheck::from_flag(2, true).reduce_warmth);
        let high = DependencyCheck::from_flag(3, false);
        assert!(high.reduce_warmth);
        assert!(high.increase_redirection);
    }
}
