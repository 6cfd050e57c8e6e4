//! Dependency tracker
//!
//! Watches the user's own messages for exclusive reliance on the assistant
//! or venting that keeps looping. Each matching message raises the per-user
//! flag by one, up to `DEPENDENCY_FLAG_CAP`. From `DEPENDENCY_THRESHOLD` on,
//! draft requests ask for less warmth and more real-world redirection.

use crate::core::patterns::DEPENDENCY_SIGNAL;
use crate::types::DependencyCheck;
use crate::DEPENDENCY_FLAG_CAP;

pub fn has_dependency_signal(user_text: &str) -> bool {
    DEPENDENCY_SIGNAL.is_match(user_text)
}

/// Fold this message into the stored flag
pub fn check_dependency(previous_flag: u32, user_text: &str) -> DependencyCheck {
    let signal = has_dependency_signal(user_text);
    let flag = if signal {
        previous_flag.saturating_add(1).min(DEPENDENCY_FLAG_CAP)
    } else {
        previous_flag
    };
    DependencyCheck::from_flag(flag, signal)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DependencyLevel;

    #[test]
    fn test_signals() {
        assert!(has_dependency_signal("Honestly, no one else understands me"));
        assert!(has_dependency_signal("You're the only one I can tell"));
        assert!(has_dependency_signal("I can only talk to you about this"));
        assert!(has_dependency_signal("이런 얘기는 너만 들어줘"));
        assert!(has_dependency_signal("아무도 내 편이 없어"));
        assert!(has_dependency_signal("또 팀장님 때문에 화가 나요"));
        assert!(has_dependency_signal("I keep getting angry at work"));
        assert!(!has_dependency_signal("My manager ignored my proposal in the meeting today"));
    }

    #[test]
    fn test_flag_rises_only_on_signal() {
        let quiet = check_dependency(2, "The meeting ran long today");
        assert_eq!(quiet.flag, 2);
        assert!(!quiet.signal);
        assert_eq!(quiet.level, DependencyLevel::Medium);

        let loud = check_dependency(2, "no one else listens to me");
        assert_eq!(loud.flag, 3);
        assert!(loud.signal);
        assert_eq!(loud.level, DependencyLevel::High);
        assert!(loud.reduce_warmth && loud.increase_redirection);
    }

    #[test]
    fn test_flag_is_capped() {
        assert_eq!(check_dependency(10, "only you get it").flag, 10);
        assert_eq!(check_dependency(9, "only you get it").flag, 10);
    }
}
