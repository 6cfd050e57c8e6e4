//! Pacing profile selector: (stage, role, risk) → output constraints

use crate::types::{Lens, MaturityStage, PacingProfile, QuestionStyle, RiskLevel, Role};

/// Pure table lookup. High risk overrides stage and role.
pub fn select_profile(stage: MaturityStage, role: Role, risk: RiskLevel) -> PacingProfile {
    if risk == RiskLevel::High {
        return PacingProfile {
            max_sentences: 2,
            allow_question: false,
            question_style: QuestionStyle::None,
            allow_action_suggestion: false,
            allowed_lens: vec![Lens::Emotion],
        };
    }

    match stage {
        MaturityStage::Blame | MaturityStage::Reaction => PacingProfile {
            max_sentences: 2,
            allow_question: true,
            question_style: QuestionStyle::OneShort,
            allow_action_suggestion: false,
            allowed_lens: vec![Lens::Emotion, Lens::Meaning],
        },
        MaturityStage::Awareness => awareness_profile(),
        MaturityStage::Ownership => ownership_profile(),
        MaturityStage::Alignment => {
            let mut profile = ownership_profile();
            if role == Role::Leader {
                profile.allowed_lens.push(Lens::Alignment);
            }
            profile
        }
    }
}

/// Profile for a stage label; unknown labels get the awareness profile
pub fn select_profile_for_label(label: &str, role: Role, risk: RiskLevel) -> PacingProfile {
    match MaturityStage::from_label(label) {
        Some(stage) => select_profile(stage, role, risk),
        None if risk == RiskLevel::High => select_profile(MaturityStage::Awareness, role, risk),
        None => awareness_profile(),
    }
}

fn awareness_profile() -> PacingProfile {
    PacingProfile {
        max_sentences: 3,
        allow_question: true,
        question_style: QuestionStyle::OneShort,
        allow_action_suggestion: false,
        allowed_lens: vec![Lens::Emotion, Lens::Meaning, Lens::Perspective],
    }
}

fn ownership_profile() -> PacingProfile {
    PacingProfile {
        max_sentences: 3,
        allow_question: true,
        question_style: QuestionStyle::OneShort,
        allow_action_suggestion: true,
        allowed_lens: vec![Lens::Emotion, Lens::Meaning, Lens::Perspective, Lens::Ownership],
    }
}
