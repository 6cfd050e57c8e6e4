//! Pattern rulesets
//!
//! Every classifier in the crate reads its patterns from here as data:
//! ordered `(label, weight, patterns)` groups that can be versioned and
//! tested apart from the pipeline logic. All patterns are case-insensitive.
//! Ruleset version: `crate::RULESET_VERSION`.

use lazy_static::lazy_static;
use regex::Regex;
use crate::types::{Emotion, MaturityStage};

/// A named group of alternative patterns
#[derive(Debug)]
pub struct PatternGroup {
    pub name: &'static str,
    pub weight: f64,
    patterns: Vec<Regex>,
}

impl PatternGroup {
    fn new(name: &'static str, weight: f64, sources: &[&str]) -> Self {
        let patterns = sources
            .iter()
            .map(|s| Regex::new(&format!("(?i){}", s)).unwrap())
            .collect();
        Self { name, weight, patterns }
    }

    /// Any pattern matches
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Number of patterns that match (each pattern counts once)
    pub fn hit_count(&self, text: &str) -> usize {
        self.patterns.iter().filter(|p| p.is_match(text)).count()
    }

    /// Weighted score: hits × weight
    pub fn score(&self, text: &str) -> f64 {
        self.hit_count(text) as f64 * self.weight
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Stage rule: a pattern group feeding one stage's score
#[derive(Debug)]
pub struct StageRule {
    pub stage: MaturityStage,
    pub group: PatternGroup,
}

/// Emotion tag nudges applied after pattern scoring
pub const EMOTION_STAGE_NUDGES: &[(Emotion, MaturityStage, f64)] = &[
    (Emotion::Anger, MaturityStage::Reaction, 1.0),
    (Emotion::Frustration, MaturityStage::Reaction, 1.0),
    (Emotion::Shame, MaturityStage::Awareness, 0.5),
    (Emotion::Fear, MaturityStage::Reaction, 0.5),
    (Emotion::Fear, MaturityStage::Awareness, 0.5),
];

lazy_static! {
    // =========================================================================
    // Maturity stage groups, in tie-break order (later wins on equal score)
    // =========================================================================
    pub static ref STAGE_RULES: Vec<StageRule> = vec![
        StageRule {
            stage: MaturityStage::Blame,
            group: PatternGroup::new("blame", 1.0, &[
                r"걔가|그 사람이|그들이|그녀가|그들.*탓|their.*fault",
                r"회사.*탓|조직.*탓|상황.*탓|환경.*탓|circumstances.*fault",
                r"비난|경멸|despise|blame.*them|fault.*others",
                r"다른.*사람.*때문|other.*people.*fault|because.*of.*them",
                r"상대방.*문제|their.*problem|not.*my.*fault",
            ]),
        },
        StageRule {
            stage: MaturityStage::Reaction,
            group: PatternGroup::new("reaction", 1.0, &[
                r"너무.*화나|너무.*불안|너무.*억울|too.*angry|too.*anxious",
                r"감정.*폭발|emotion.*explosion|feeling.*overwhelmed",
                r"결론.*없|no.*conclusion|don.*know.*what.*to.*do",
                r"자동.*반응|automatic.*reaction|couldn.*help.*reacting",
                r"반응.*할.*수.*밖에|had.*to.*react|no.*choice.*but.*react",
                r"어쩔.*수.*없|할.*수.*없|had.*no.*choice",
            ]),
        },
        StageRule {
            stage: MaturityStage::Awareness,
            group: PatternGroup::new("awareness", 1.0, &[
                r"내가.*반응|내.*반응|my.*reaction|I.*reacted",
                r"내가.*왜|why.*did.*I|내가.*어떻게|how.*did.*I",
                r"자기.*관찰|self.*observation|noticing.*myself",
                r"내.*감정|my.*feeling|내.*느낌|what.*I.*feel",
                r"내가.*느끼|I.*feel|내.*마음|my.*mind",
                r"인식|realize|recognize|알아차리",
            ]),
        },
        StageRule {
            stage: MaturityStage::Ownership,
            group: PatternGroup::new("ownership", 1.0, &[
                r"내가.*할.*수.*있는|what.*I.*can.*do|내가.*먼저|I.*first",
                r"내가.*바꾸면|if.*I.*change|내가.*변화|I.*can.*change",
                r"내.*책임|my.*responsibility|내.*선택|my.*choice",
                r"내가.*결정|I.*decide|내가.*통제|I.*control",
                r"내.*부분|my.*part|내.*역할|my.*role",
                r"내가.*해야|I.*should|내가.*해야.*할|I.*need.*to",
            ]),
        },
        StageRule {
            stage: MaturityStage::Alignment,
            group: PatternGroup::new("alignment", 1.0, &[
                r"내.*기준|my.*standard|내.*가치|my.*value|내.*원칙|my.*principle",
                r"1년.*뒤|year.*later|미래|future|long.*term",
                r"정렬|alignment|일치|match|consistent",
                r"되.*싶은.*사람|who.*I.*want.*to.*be|내.*정체성|my.*identity",
                r"가치.*기반|value.*based|원칙.*기반|principle.*based",
                r"조직.*문화|organizational.*culture|신뢰.*문화|trust.*culture",
            ]),
        },
    ];

    // =========================================================================
    // Responsibility-tone phrasing (routes silence picks to "growth")
    // =========================================================================
    pub static ref RESPONSIBILITY_TONE: PatternGroup = PatternGroup::new("responsibility_tone", 1.0, &[
        r"내가.*할.*수.*있는|what.*I.*can.*do|내가.*먼저|I.*first",
        r"내가.*바꾸면|if.*I.*change|내가.*변화|I.*can.*change",
        r"내.*책임|my.*responsibility|내.*선택|my.*choice",
        r"내가.*결정|I.*decide|내가.*통제|I.*control",
        r"내가.*해야|I.*should|내가.*해야.*할|I.*need.*to",
        r"책임|responsibility|accountability",
        r"통제.*영역|controllable|my\s+part",
    ]);

    // =========================================================================
    // Corporate coaching tone (CSS coaching penalty)
    // =========================================================================
    pub static ref COACHING: PatternGroup = PatternGroup::new("coaching", 1.0, COACHING_SOURCES);

    // =========================================================================
    // Tone drift: therapy, coaching, praise, over-validation, moralizing
    // =========================================================================
    pub static ref TONE_DRIFT: PatternGroup = {
        let mut sources: Vec<&str> = vec![
            r"치료|therapy|therapeutic|상담|counseling|심리.*치료",
            r"트라우마|trauma|PTSD|정신.*건강|mental.*health",
            r"치유|healing|회복.*과정|recovery.*process",
        ];
        sources.extend_from_slice(COACHING_SOURCES);
        sources.extend_from_slice(&[
            r"인상적입니다|impressive|훌륭합니다|excellent|대단합니다|amazing",
            r"잘하고.*있어요|doing.*great|좋은.*일|good.*job",
            r"완전히.*이해|completely.*understand|정말.*맞아|absolutely.*right",
            r"당신.*맞아요|you.*right|그렇게.*생각|think.*so",
            r"옳은.*선택|right.*choice|올바른|correct|선한|good.*thing",
            r"윤리적|ethical|도덕적|moral|정의|justice",
            r"정말.*좋아요|really.*good|너무.*좋아|so.*great|완벽해|perfect",
            r"대단해요|wonderful|멋져요|awesome|훌륭해요|fantastic",
        ]);
        PatternGroup::new("tone_drift", 1.0, &sources)
    };

    // =========================================================================
    // Emotion probe: the reply asks how the user feels
    // =========================================================================
    pub static ref EMOTION_PROBE: PatternGroup = PatternGroup::new("emotion_probe", 1.0, &[
        r"어떤.*감정|어떤.*느낌|어떤.*기분|what.*feel|how.*feel",
        r"감정.*이름|name.*feeling|느낌.*말해|기분.*표현",
        r"지금.*느끼|지금.*감정|지금.*기분|right.*now.*feel",
        r"어떤.*느껴|어떤.*느낌|어떤.*기분",
        r"감정.*있|느낌.*있|기분.*있|feel.*emotion",
        r"어떤.*마음|what.*mind|what.*heart",
        r"상태.*어떤|state.*how|condition.*how",
    ]);

    // =========================================================================
    // Dependency signal in the user's own message: exclusive reliance on
    // the assistant, or venting that keeps looping
    // =========================================================================
    pub static ref DEPENDENCY_SIGNAL: PatternGroup = PatternGroup::new("dependency_signal", 1.0, &[
        r"only\s+(you|ai|bot|this|here)",
        r"can\s+only\s+talk\s+to\s+(you|ai|bot)",
        r"no\s+one\s+else\s+(understands|listens|gets)",
        r"you['’]re\s+the\s+only\s+one",
        r"혼자|나만|너만|당신만|여기만",
        r"다른.*없어|아무도.*없어",
        r"오직.*당신|오직.*너",
        r"(계속|또|다시|또다시).*(화|짜증|슬프|힘들)",
        r"(always|keep|still).*(angry|sad|frustrated|upset)",
    ]);

    // =========================================================================
    // Action suggestion (pacing penalty when the profile forbids it)
    // =========================================================================
    pub static ref ACTION_SUGGESTION: PatternGroup = PatternGroup::new("action_suggestion", 1.0, &[
        r"할.*수.*있는.*걸음|다음.*단계|작은.*실험|한.*가지만.*해보|시도해보",
        r"해야|해야.*할|해볼.*수|시작해볼|바꿔볼",
        r"next.*step|small.*action|try.*change|experiment",
    ]);

    // =========================================================================
    // Conversational moves; a reply should make at most one
    // =========================================================================
    pub static ref MOVE_GROUPS: Vec<PatternGroup> = vec![
        PatternGroup::new("emotional_clarification", 1.0, &[
            r"어떤.*감정|어떤.*느낌|어떤.*기분|what.*feel|how.*feel|감정.*이름|name.*feeling",
            r"지금.*느끼|지금.*감정|지금.*기분|right.*now.*feel|마음.*어떤",
        ]),
        PatternGroup::new("fact_interpretation", 1.0, &[
            r"실제.*일어난|actually.*happened|fact.*only|사실.*만|객관적",
            r"해석|interpretation|의미.*부여|story.*about",
            r"다른.*사람.*봤다면|how.*others.*see|other.*person.*view",
        ]),
        PatternGroup::new("responsibility", 1.0, &[
            r"통제|control|할.*수.*있는|within.*influence|책임|responsibility",
            r"당신.*부분|your.*part|내.*부분|my.*part|역할|role",
        ]),
        PatternGroup::new("perspective", 1.0, &[
            r"상대방.*입장|other.*person.*perspective|다른.*관점|alternative.*view",
            r"6개월.*후|1년.*후|6.*months.*later|year.*later|미래.*돌아보",
            r"조직.*맥락|organizational.*context|팀.*흐름|team.*flow",
        ]),
        PatternGroup::new("action", 1.0, &[
            r"할.*수.*있는.*걸음|next.*step|다음.*단계|small.*action",
            r"실험|experiment|바꿔보|try.*change|한.*가지만",
        ]),
    ];
}

const COACHING_SOURCES: &[&str] = &[
    r"방향성|direction|roadmap|전략",
    r"목표.*설정|goal.*setting|목표.*달성",
    r"성장.*기회|growth.*opportunity|개발.*영역",
    r"핵심.*역량|core.*competency|역량.*개발",
    r"리더십.*스킬|leadership.*skill|스킬.*향상",
    r"효과적.*방법|effective.*way|효율적.*접근",
    r"최적화|optimization|최적.*해결",
    r"프레임워크|framework|모델.*적용",
    r"KPI|지표.*관리|성과.*측정",
    r"비즈니스.*관점|business.*perspective|조직.*관점",
    r"전략적.*사고|strategic.*thinking|전략.*수립",
    r"실행.*계획|action.*plan|실행.*로드맵",
];

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rulesets_compile() {
        assert_eq!(STAGE_RULES.len(), 5);
        assert!(!RESPONSIBILITY_TONE.is_empty());
        assert_eq!(COACHING.len(), 12);
        assert_eq!(TONE_DRIFT.len(), 3 + 12 + 8);
        assert_eq!(EMOTION_PROBE.len(), 7);
        assert_eq!(ACTION_SUGGESTION.len(), 3);
        assert_eq!(DEPENDENCY_SIGNAL.len(), 9);
        assert_eq!(MOVE_GROUPS.len(), 5);
    }

    #[test]
    fn test_stage_rules_in_tie_break_order() {
        let order: Vec<MaturityStage> = STAGE_RULES.iter().map(|r| r.stage).collect();
        assert_eq!(order, MaturityStage::ALL.to_vec());
    }

    #[test]
    fn test_case_insensitive_matching() {
        assert!(COACHING.is_match("Let's build a ROADMAP"));
        assert!(EMOTION_PROBE.is_match("How do you FEEL about it"));
        assert!(RESPONSIBILITY_TONE.is_match("That is My Responsibility"));
    }

    #[test]
    fn test_hit_count_counts_patterns_once() {
        let text = "roadmap roadmap roadmap";
        assert_eq!(COACHING.hit_count(text), 1);
        assert_eq!(COACHING.score(text), 1.0);
    }
}
