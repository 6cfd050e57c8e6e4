//! Key-point reflection library
//!
//! One-sentence reflections of the user's key point, by category. The
//! reflection opens every spoken reply. Templates never produce a
//! question. Selection avoids the user's last five templates.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::core::text::is_question_marker;
use crate::types::{Emotion, IntentKind, RecentIndices};
use crate::REFLECTION_HISTORY_CAPACITY;

const EMPTY_KEY_POINT_REFLECTION: &str = "지금 마음에 와 닿는 말씀이 있으시군요.";
const DEFAULT_KEY_POINT: &str = "사용자의 말씀";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionCategory {
    Anxiety,
    Anger,
    Joy,
    Mission,
    Conflict,
    Finance,
}

impl ReflectionCategory {
    pub const ALL: [ReflectionCategory; 6] = [
        ReflectionCategory::Anxiety,
        ReflectionCategory::Anger,
        ReflectionCategory::Joy,
        ReflectionCategory::Mission,
        ReflectionCategory::Conflict,
        ReflectionCategory::Finance,
    ];
}

/// Intent wins over emotion; emotion over the intent-based default
pub fn reflection_category(emotion: Emotion, intent: IntentKind) -> ReflectionCategory {
    match intent {
        IntentKind::Money => return ReflectionCategory::Finance,
        IntentKind::Conflict | IntentKind::Venting => return ReflectionCategory::Conflict,
        _ => {}
    }
    match emotion {
        Emotion::Anger => ReflectionCategory::Anger,
        Emotion::Fear
        | Emotion::Frustration
        | Emotion::Confusion
        | Emotion::Shame
        | Emotion::IsolationSignal => ReflectionCategory::Anxiety,
        Emotion::Elevation | Emotion::CreativeFulfillment => ReflectionCategory::Joy,
        Emotion::MissionDrive => ReflectionCategory::Mission,
        Emotion::RelationalDependency => ReflectionCategory::Conflict,
    }
}

/// Sentence shapes around the key point
#[derive(Debug, Clone, Copy)]
enum Template {
    /// "<kp>(이)라는/다는" + suffix
    Statement(&'static str),
    /// "<kp>가/이" + suffix
    Subject(&'static str),
    /// "<kp>" + suffix
    Plain(&'static str),
    /// "<kp>(이)라는" + suffix
    Quoted(&'static str),
}

const ANXIETY: &[Template] = &[
    Template::Statement(" 말이네요."),
    Template::Subject(" 핵심인 것 같아요."),
    Template::Plain(" 마음이 흔들리는 느낌이군요."),
    Template::Plain(" 때문에 불안해지시는군요."),
    Template::Subject(" 마음에 걸리는 것 같아요."),
];

const ANGER: &[Template] = &[
    Template::Statement(" 말이네요."),
    Template::Subject(" 핵심인 것 같아요."),
    Template::Plain(" 때문에 화가 나시는군요."),
    Template::Subject(" 신경에 걸리시는 것 같아요."),
];

const JOY: &[Template] = &[
    Template::Statement(" 말이네요."),
    Template::Subject(" 핵심인 것 같아요."),
    Template::Subject(" 기쁘신 것 같아요."),
    Template::Quoted(" 느낌이 드시는군요."),
];

const MISSION: &[Template] = &[
    Template::Statement(" 말이네요."),
    Template::Subject(" 핵심인 것 같아요."),
    Template::Subject(" 중요하신 것 같아요."),
    Template::Plain("에 대한 의미가 있으시군요."),
];

const CONFLICT: &[Template] = &[
    Template::Statement(" 말이네요."),
    Template::Subject(" 핵심인 것 같아요."),
    Template::Plain(" 때문에 마음이 혼란스러우신 것 같아요."),
    Template::Subject(" 걸리시는군요."),
];

const FINANCE: &[Template] = &[
    Template::Statement(" 말이네요."),
    Template::Subject(" 핵심인 것 같아요."),
    Template::Subject(" 걱정되시는군요."),
    Template::Plain("에 대한 부담이 있으신 것 같아요."),
];

fn templates_of(category: ReflectionCategory) -> &'static [Template] {
    match category {
        ReflectionCategory::Anxiety => ANXIETY,
        ReflectionCategory::Anger => ANGER,
        ReflectionCategory::Joy => JOY,
        ReflectionCategory::Mission => MISSION,
        ReflectionCategory::Conflict => CONFLICT,
        ReflectionCategory::Finance => FINANCE,
    }
}

fn offset_of(category: ReflectionCategory) -> usize {
    ReflectionCategory::ALL
        .iter()
        .take_while(|c| **c != category)
        .map(|c| templates_of(*c).len())
        .sum()
}

/// Hangul syllable with a final consonant
fn has_final_consonant(c: char) -> bool {
    let code = c as u32;
    (0xAC00..=0xD7A3).contains(&code) && (code - 0xAC00) % 28 != 0
}

fn last_letter(text: &str) -> Option<char> {
    text.chars().filter(|c| !c.is_whitespace()).last()
}

/// Subject particle 이/가
fn subject_particle(text: &str) -> &'static str {
    match last_letter(text) {
        Some(c) if has_final_consonant(c) => "이",
        _ => "가",
    }
}

fn quote_particle(text: &str) -> &'static str {
    match last_letter(text) {
        Some(c) if has_final_consonant(c) => "이라는",
        _ => "라는",
    }
}

fn render(template: Template, key_point: &str) -> String {
    let kp = key_point.trim();
    match template {
        Template::Statement(suffix) => {
            if kp.is_empty() {
                return EMPTY_KEY_POINT_REFLECTION.to_string();
            }
            let cleaned = kp.trim_end().trim_end_matches('.').trim_end();
            let ending = if cleaned.ends_with('다') { "는" } else { quote_particle(cleaned) };
            format!("{}{}{}", cleaned, ending, suffix)
        }
        Template::Subject(suffix) => {
            if kp.is_empty() {
                return EMPTY_KEY_POINT_REFLECTION.to_string();
            }
            format!("{}{}{}", kp, subject_particle(kp), suffix)
        }
        Template::Plain(suffix) => format!("{}{}", kp, suffix),
        Template::Quoted(suffix) => format!("{}{}{}", kp, quote_particle(kp), suffix),
    }
}

/// A rendered reflection and its template index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reflection {
    pub text: String,
    pub category: ReflectionCategory,
    /// Global template index
    pub template: usize,
}

/// Pick a template avoiding the recent history, render it, and record it
pub fn select_reflection<R: Rng + ?Sized>(
    key_point: &str,
    category: ReflectionCategory,
    history: &mut RecentIndices,
    rng: &mut R,
) -> Reflection {
    let kp: String = key_point.chars().filter(|c| !is_question_marker(*c)).collect();
    let kp = if kp.trim().is_empty() { DEFAULT_KEY_POINT.to_string() } else { kp };

    history.clamp(REFLECTION_HISTORY_CAPACITY);
    let offset = offset_of(category);
    let all: Vec<usize> = (offset..offset + templates_of(category).len()).collect();
    let available: Vec<usize> = all.iter().copied().filter(|i| !history.contains(*i)).collect();
    let pool = if available.is_empty() { &all } else { &available };

    let template = pool.choose(rng).copied().unwrap_or(offset);
    let text = render(templates_of(category)[template - offset], &kp);

    history.push(template, REFLECTION_HISTORY_CAPACITY);

    Reflection { text: text.trim().to_string(), category, template }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_category_mapping() {
        assert_eq!(reflection_category(Emotion::Anger, IntentKind::Money), ReflectionCategory::Finance);
        assert_eq!(reflection_category(Emotion::Elevation, IntentKind::Venting), ReflectionCategory::Conflict);
        assert_eq!(reflection_category(Emotion::Anger, IntentKind::Other), ReflectionCategory::Anger);
        assert_eq!(reflection_category(Emotion::Shame, IntentKind::Other), ReflectionCategory::Anxiety);
        assert_eq!(reflection_category(Emotion::MissionDrive, IntentKind::ShareStory), ReflectionCategory::Mission);
    }

    #[test]
    fn test_korean_particles() {
        assert_eq!(render(Template::Subject(" 핵심인 것 같아요."), "갈등"), "갈등이 핵심인 것 같아요.");
        assert_eq!(render(Template::Subject(" 핵심인 것 같아요."), "스트레스"), "스트레스가 핵심인 것 같아요.");
        assert_eq!(render(Template::Statement(" 말이네요."), "힘들다."), "힘들다는 말이네요.");
        assert_eq!(render(Template::Statement(" 말이네요."), "갈등"), "갈등이라는 말이네요.");
        assert_eq!(render(Template::Statement(" 말이네요."), "스트레스"), "스트레스라는 말이네요.");
    }

    #[test]
    fn test_never_contains_question() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut history = RecentIndices::new();
        for _ in 0..10 {
            let r = select_reflection("왜 나만?", ReflectionCategory::Anxiety, &mut history, &mut rng);
            assert!(!r.text.contains('?'));
        }
    }

    #[test]
    fn test_avoids_recent_templates_until_exhausted() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut history = RecentIndices::new();
        let mut seen = Vec::new();
        // Anger has 4 templates; the first 4 picks are all distinct
        for _ in 0..4 {
            let r = select_reflection("마감", ReflectionCategory::Anger, &mut history, &mut rng);
            assert!(!seen.contains(&r.template));
            seen.push(r.template);
        }
        let r = select_reflection("마감", ReflectionCategory::Anger, &mut history, &mut rng);
        assert!(seen.contains(&r.template));
    }

    #[test]
    fn test_stale_history_beyond_capacity_is_ignored() {
        let mut rng = StdRng::seed_from_u64(6);
        let o = offset_of(ReflectionCategory::Anger);
        // Only the newest five count, so o + 3 is free again
        let mut history = RecentIndices::from_slice(&[o + 3, o, o + 1, o + 2, 900, 901]);
        let r = select_reflection("마감", ReflectionCategory::Anger, &mut history, &mut rng);
        assert_eq!(r.template, o + 3);
        assert_eq!(history.len(), REFLECTION_HISTORY_CAPACITY);
    }

    #[test]
    fn test_empty_key_point_uses_default() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut history = RecentIndices::new();
        let r = select_reflection("", ReflectionCategory::Mission, &mut history, &mut rng);
        assert!(r.text.starts_with(DEFAULT_KEY_POINT));
    }
}
