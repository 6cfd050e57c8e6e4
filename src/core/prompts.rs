//! Generation request builders

use crate::core::config::RuleConfig;
use crate::core::generator::{GenerationKind, GenerationRequest};
use crate::types::{CriticResult, DependencyCheck, Lens, PacingProfile, QuestionStyle};

/// Draft request shaped by the pacing profile and the user's dependency level
pub fn draft_request(
    profile: &PacingProfile,
    config: &RuleConfig,
    dependency: &DependencyCheck,
    user_text: &str,
    key_point: &str,
) -> GenerationRequest {
    let mut lines = vec![
        format!(
            "Reply in {} with a {} tone.",
            config.rewrite_style.language, config.rewrite_style.tone
        ),
        format!("At most {} sentences.", profile.max_sentences),
        question_rule(profile).to_string(),
    ];

    if profile.allow_action_suggestion {
        lines.push("Suggest at most ONE tiny action, only if it fits.".to_string());
    } else {
        lines.push("Do not suggest actions.".to_string());
    }

    let lenses: Vec<&str> = profile.allowed_lens.iter().map(lens_name).collect();
    lines.push(format!("Stay within these lenses: {}.", lenses.join(", ")));
    lines.push("Never claim personal experience. Do not moralize. No coaching phrases.".to_string());
    if dependency.reduce_warmth || dependency.increase_redirection {
        lines.push(format!(
            "User dependency flag is {} ({}). Keep the emotional tone low and skip warm affirmations or heavy validation. Point toward real-world steps and the people around them who can support them.",
            dependency.flag,
            dependency.level.as_str()
        ));
    }
    if !key_point.trim().is_empty() {
        lines.push(format!("The user's key point: {}", key_point.trim()));
    }

    GenerationRequest {
        kind: GenerationKind::Draft,
        instructions: lines.join("\n"),
        input: user_text.to_string(),
    }
}

/// Rewrite request listing the violated rules
pub fn rewrite_request(
    critic: &CriticResult,
    config: &RuleConfig,
    max_sentences: usize,
    user_text: &str,
    draft: &str,
) -> GenerationRequest {
    let issues = if critic.issues.is_empty() {
        "No specific issues listed.".to_string()
    } else {
        critic.tagged().join("\n- ")
    };

    let mut rules = vec![
        format!("- {}", config.rewrite_style.language),
        format!("- {} tone", config.rewrite_style.tone),
        "- First sentence must reflect the user's key meaning".to_string(),
        format!("- Max {} sentences (or fewer)", max_sentences),
        format!("- Max {} question, optional", config.rewrite_constraints.max_questions),
        "- Do not mention your own experience".to_string(),
    ];
    if critic.has(crate::types::IssueKind::FalsePersona) {
        rules.push(format!(
            "- NEVER claim personal experience, memories, or biography. Use \"{}\" instead.",
            config.false_persona_replacement
        ));
    }
    rules.push(format!(
        "- Do not use these phrases: {}",
        config.banned_phrases.join(", ")
    ));
    rules.push("- Do not moralize".to_string());

    GenerationRequest {
        kind: GenerationKind::Rewrite,
        instructions: format!(
            "Rewrite the assistant message to fix these issues:\n- {}\n\nRules:\n{}\nReturn only the final rewritten message.",
            issues,
            rules.join("\n")
        ),
        input: format!("User said: {}\n\nCurrent assistant draft:\n{}", user_text, draft),
    }
}

/// What a compression must achieve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressTarget {
    /// ≤2 sentences and a single question
    OneQuestion,
    /// Fit within the char cap, keeping a single question
    CharCapOneQuestion(usize),
    /// Fit within the char cap
    CharCap(usize),
}

pub fn compress_request(text: &str, target: CompressTarget, config: &RuleConfig) -> GenerationRequest {
    let style = format!(
        "{} tone, {}.",
        config.rewrite_style.tone, config.rewrite_style.language
    );
    let instructions = match target {
        CompressTarget::OneQuestion => format!(
            "Rewrite into <=2 sentences and only ONE question, {} Keep the core meaning intact.",
            style
        ),
        CompressTarget::CharCapOneQuestion(max) => format!(
            "Compress this text to <={} characters while preserving core meaning, {} Keep only ONE question.",
            max, style
        ),
        CompressTarget::CharCap(max) => format!(
            "Compress this text to <={} characters while preserving core meaning, {}",
            max, style
        ),
    };
    GenerationRequest {
        kind: GenerationKind::Compress,
        instructions,
        input: text.to_string(),
    }
}

pub fn reduce_moves_request(text: &str, config: &RuleConfig) -> GenerationRequest {
    GenerationRequest {
        kind: GenerationKind::ReduceMoves,
        instructions: format!(
            "Reduce this response to focus on ONLY ONE conversational move. Keep {} tone, {}, <={} sentences, max {} question.",
            config.rewrite_style.tone,
            config.rewrite_style.language,
            config.thresholds.max_sentences,
            config.thresholds.max_questions
        ),
        input: text.to_string(),
    }
}

fn question_rule(profile: &PacingProfile) -> &'static str {
    if !profile.allow_question {
        return "No question marks.";
    }
    match profile.question_style {
        QuestionStyle::None => "No question marks.",
        QuestionStyle::OneShort => "Maximum one short question.",
        QuestionStyle::OfferTwoChoices => "End with exactly 2 options, no extra question.",
    }
}

fn lens_name(lens: &Lens) -> &'static str {
    match lens {
        Lens::Emotion => "emotion",
        Lens::Meaning => "meaning",
        Lens::Perspective => "perspective",
        Lens::Ownership => "ownership",
        Lens::Alignment => "alignment",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pacing::select_profile;
    use crate::types::{CriticIssue, IssueKind, MaturityStage, RiskLevel, Role};

    #[test]
    fn test_draft_request_follows_profile() {
        let config = RuleConfig::default();
        let profile = select_profile(MaturityStage::Reaction, Role::Staff, RiskLevel::High);
        let req = draft_request(&profile, &config, &DependencyCheck::default(), "hello", "deadline");
        assert_eq!(req.kind, GenerationKind::Draft);
        assert!(req.instructions.contains("At most 2 sentences."));
        assert!(req.instructions.contains("No question marks."));
        assert!(req.instructions.contains("Do not suggest actions."));
        assert!(req.instructions.contains("deadline"));
        assert!(!req.instructions.contains("dependency"));
    }

    #[test]
    fn test_draft_request_redirects_at_high_dependency() {
        let config = RuleConfig::default();
        let profile = select_profile(MaturityStage::Awareness, Role::Staff, RiskLevel::Low);

        let medium = draft_request(&profile, &config, &DependencyCheck::from_flag(2, true), "hi", "");
        assert!(!medium.instructions.contains("dependency"));

        let high = draft_request(&profile, &config, &DependencyCheck::from_flag(3, true), "hi", "");
        assert!(high.instructions.contains("User dependency flag is 3 (high)"));
        assert!(high.instructions.contains("real-world"));
    }

    #[test]
    fn test_rewrite_request_carries_issues_and_banned_list() {
        let config = RuleConfig::default();
        let critic = crate::types::CriticResult::from_issues(vec![CriticIssue::with_matches(
            IssueKind::FalsePersona,
            vec!["제 경험".to_string()],
        )]);
        let req = rewrite_request(&critic, &config, 3, "user", "draft");
        assert_eq!(req.kind, GenerationKind::Rewrite);
        assert!(req.instructions.contains("false_persona"));
        assert!(req.instructions.contains(&config.false_persona_replacement));
        assert!(req.instructions.contains("방향성"));
        assert!(req.input.contains("draft"));
    }
}
