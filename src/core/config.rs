//! Runtime rule config
//!
//! Base rules merged with optional JSON overrides. List overrides are
//! appended to the base lists; scalar overrides replace the base value.
//! Providers are read on every turn so edits apply without a restart.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;
use crate::error::ConfigError;

const BASE_BANNED_PHRASES: &[&str] = &[
    "가장 도전적으로",
    "방향성",
    "구체적으로 생각해",
    "어떤 감정인지",
    "조금 더 들어볼까요",
    "어떻게 해석",
    "통제할 수 있는 부분",
];

const BASE_FALSE_PERSONA_SOURCES: &[&str] = &[
    r"제\s*경험",
    r"제가\s+겪어본",
    r"기억에\s+남는",
    r"나도\s+[^.!?\n]*?했어",
    r"나\s*는\s+[^.!?\n]*?해봤어",
    r"내\s*경험",
    r"나도\s+",
    r"나\s+역시",
    r"내가\s+겪었",
    r"저도\s+했",
    r"제가\s+했",
    r"나\s+같이",
    r"저\s+같이",
];

const BASE_DEPENDENCY_RISK_SOURCES: &[&str] = &[
    r"나만\s*믿어",
    r"나한테\s*맡겨",
    r"여기서\s*항상\s*있을게",
    r"언제나\s*여기\s*있을게",
    r"당신만의\s*편",
    r"함께\s*있을게요",
    r"영원히\s*함께",
    r"내가\s*지켜줄게",
    r"혼자가\s*아니에요",
    r"나\s*있잖아",
    r"오직\s*나만",
];

const BASE_FALSE_PERSONA_REPLACEMENT: &str = "리더 입장에서 함께 정리해볼게요.";

/// A configured regex. Sources that fail to compile never match.
#[derive(Debug, Clone)]
pub struct RulePattern {
    source: String,
    regex: Option<Regex>,
}

impl RulePattern {
    pub fn compile(source: &str) -> Self {
        let regex = match Regex::new(source) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern = source, error = %e, "invalid rule pattern, it will never match");
                None
            }
        };
        Self { source: source.to_string(), regex }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// First matched span, trimmed
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.as_ref()?.find(text).map(|m| m.as_str().trim())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().map(|re| re.is_match(text)).unwrap_or(false)
    }
}

impl Serialize for RulePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub max_sentences: usize,
    pub max_questions: usize,
    pub max_chars: usize,
    pub context_drift_overlap: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_sentences: 3,
            max_questions: 1,
            max_chars: 280,
            context_drift_overlap: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteConstraints {
    pub max_sentences: usize,
    pub max_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStyle {
    pub language: String,
    pub tone: String,
}

impl Default for RewriteStyle {
    fn default() -> Self {
        Self {
            language: "Korean".to_string(),
            tone: "warm mentor".to_string(),
        }
    }
}

/// Effective rules for one turn
#[derive(Debug, Clone, Serialize)]
pub struct RuleConfig {
    pub banned_phrases: Vec<String>,
    pub false_persona_patterns: Vec<RulePattern>,
    pub false_persona_replacement: String,
    pub dependency_risk_patterns: Vec<RulePattern>,
    pub rewrite_constraints: RewriteConstraints,
    pub thresholds: Thresholds,
    pub rewrite_style: RewriteStyle,
}

impl Default for RuleConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            banned_phrases: BASE_BANNED_PHRASES.iter().map(|s| s.to_string()).collect(),
            false_persona_patterns: compile_all(BASE_FALSE_PERSONA_SOURCES.iter().copied()),
            false_persona_replacement: BASE_FALSE_PERSONA_REPLACEMENT.to_string(),
            dependency_risk_patterns: compile_all(BASE_DEPENDENCY_RISK_SOURCES.iter().copied()),
            rewrite_constraints: RewriteConstraints {
                max_sentences: thresholds.max_sentences,
                max_questions: thresholds.max_questions,
            },
            thresholds,
            rewrite_style: RewriteStyle::default(),
        }
    }
}

fn compile_all<'a>(sources: impl Iterator<Item = &'a str>) -> Vec<RulePattern> {
    sources.map(RulePattern::compile).collect()
}

impl RuleConfig {
    /// Base rules merged with overrides
    pub fn with_overrides(overrides: &ConfigOverrides) -> Self {
        let mut config = Self::default();

        if let Some(ref phrases) = overrides.banned_phrases {
            config.banned_phrases.extend(phrases.iter().cloned());
        }

        if let Some(ref rules) = overrides.critic_rules {
            if let Some(ref sources) = rules.false_persona_patterns {
                config
                    .false_persona_patterns
                    .extend(compile_all(sources.iter().map(String::as_str)));
            }
            if let Some(ref replacement) = rules.false_persona_replacement {
                config.false_persona_replacement = replacement.clone();
            }
            if let Some(ref sources) = rules.dependency_risk_patterns {
                config
                    .dependency_risk_patterns
                    .extend(compile_all(sources.iter().map(String::as_str)));
            }
        }

        if let Some(ref rc) = overrides.rewrite_constraints {
            if let Some(v) = rc.max_sentences {
                config.rewrite_constraints.max_sentences = v;
            }
            if let Some(v) = rc.max_questions {
                config.rewrite_constraints.max_questions = v;
            }
        }

        if let Some(ref t) = overrides.thresholds {
            if let Some(v) = t.max_sentences {
                config.thresholds.max_sentences = v;
            }
            if let Some(v) = t.max_questions {
                config.thresholds.max_questions = v;
            }
            if let Some(v) = t.max_chars {
                config.thresholds.max_chars = v;
            }
            if let Some(v) = t.context_drift_overlap {
                config.thresholds.context_drift_overlap = v;
            }
        }

        if let Some(ref style) = overrides.rewrite_style {
            if let Some(ref v) = style.language {
                config.rewrite_style.language = v.clone();
            }
            if let Some(ref v) = style.tone {
                config.rewrite_style.tone = v.clone();
            }
        }

        config
    }
}

// =============================================================================
// Overrides (JSON)
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub banned_phrases: Option<Vec<String>>,
    #[serde(alias = "selfCritic_rules")]
    pub critic_rules: Option<CriticRuleOverrides>,
    pub rewrite_constraints: Option<RewriteConstraintOverrides>,
    pub thresholds: Option<ThresholdOverrides>,
    pub rewrite_style: Option<RewriteStyleOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CriticRuleOverrides {
    pub false_persona_patterns: Option<Vec<String>>,
    pub false_persona_replacement: Option<String>,
    pub dependency_risk_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RewriteConstraintOverrides {
    pub max_sentences: Option<usize>,
    pub max_questions: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdOverrides {
    pub max_sentences: Option<usize>,
    pub max_questions: Option<usize>,
    pub max_chars: Option<usize>,
    pub context_drift_overlap: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RewriteStyleOverrides {
    pub language: Option<String>,
    pub tone: Option<String>,
}

impl ConfigOverrides {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }
}

// =============================================================================
// Providers
// =============================================================================

/// Source of the effective rules, consulted once per turn
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn load(&self) -> RuleConfig;
}

/// Fixed rules
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(pub RuleConfig);

#[async_trait]
impl ConfigProvider for StaticConfig {
    async fn load(&self) -> RuleConfig {
        self.0.clone()
    }
}

/// Overrides read from a JSON file on every load
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn load(&self) -> RuleConfig {
        match ConfigOverrides::from_file(&self.path).await {
            Ok(overrides) => RuleConfig::with_overrides(&overrides),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "rule overrides unavailable, using base rules");
                RuleConfig::default()
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_base_config() {
        let c = RuleConfig::default();
        assert_eq!(c.thresholds.max_chars, 280);
        assert_eq!(c.thresholds.context_drift_overlap, 0.2);
        assert!(c.banned_phrases.iter().any(|p| p == "방향성"));
        assert!(c.false_persona_patterns.iter().all(|p| p.regex().is_some()));
        assert_eq!(c.false_persona_replacement, BASE_FALSE_PERSONA_REPLACEMENT);
    }

    #[test]
    fn test_overrides_append_lists_and_replace_scalars() {
        let overrides = ConfigOverrides::from_json(
            r#"{
                "banned_phrases": ["synergy"],
                "selfCritic_rules": {
                    "false_persona_patterns": ["when I was young"],
                    "false_persona_replacement": "Let's sort this out together."
                },
                "thresholds": { "max_chars": 200 }
            }"#,
        )
        .unwrap();
        let c = RuleConfig::with_overrides(&overrides);
        assert_eq!(c.banned_phrases.len(), BASE_BANNED_PHRASES.len() + 1);
        assert_eq!(
            c.false_persona_patterns.len(),
            BASE_FALSE_PERSONA_SOURCES.len() + 1
        );
        assert_eq!(c.false_persona_replacement, "Let's sort this out together.");
        assert_eq!(c.thresholds.max_chars, 200);
        assert_eq!(c.thresholds.max_sentences, 3);
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        let p = RulePattern::compile("(unclosed");
        assert!(p.regex().is_none());
        assert!(!p.is_match("(unclosed"));
        assert_eq!(p.find("anything"), None);
    }

    #[tokio::test]
    async fn test_file_provider_rereads_each_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"banned_phrases": ["alpha"]}}"#).unwrap();
        file.flush().unwrap();

        let provider = FileConfigProvider::new(file.path());
        assert!(provider.load().await.banned_phrases.iter().any(|p| p == "alpha"));

        std::fs::write(file.path(), r#"{"banned_phrases": ["beta"]}"#).unwrap();
        let reloaded = provider.load().await;
        assert!(reloaded.banned_phrases.iter().any(|p| p == "beta"));
        assert!(!reloaded.banned_phrases.iter().any(|p| p == "alpha"));
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_base() {
        let provider = FileConfigProvider::new("/nonexistent/turnguard/rules.json");
        assert_eq!(
            provider.load().await.banned_phrases.len(),
            BASE_BANNED_PHRASES.len()
        );
    }
}
