//! Self-critic verdict types

use serde::{Deserialize, Serialize};

/// Issue severity. Ordering is significant: overall severity is the max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// The six output-contract rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Draft does not reflect the user's core words
    ContextDrift,
    /// More than one question marker
    QuestionOverload,
    /// More sentences than the profile allows
    Verbosity,
    /// Banned coaching phrase present
    CoachTone,
    /// Claims personal experience
    FalsePersona,
    /// Exclusive-bonding language
    DependencyRisk,
}

impl IssueKind {
    /// Issue signature (used in logs and quality events)
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::ContextDrift => "context_drift",
            IssueKind::QuestionOverload => "question_overload",
            IssueKind::Verbosity => "verbosity",
            IssueKind::CoachTone => "coach_tone",
            IssueKind::FalsePersona => "false_persona",
            IssueKind::DependencyRisk => "dependency_risk",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::Verbosity | IssueKind::DependencyRisk => Severity::Medium,
            _ => Severity::High,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            IssueKind::ContextDrift => "draft does not reflect user key point",
            IssueKind::QuestionOverload => "more than 1 question in response",
            IssueKind::Verbosity => "draft has too many sentences",
            IssueKind::CoachTone => "contains banned phrases",
            IssueKind::FalsePersona => "AI implying personal experience",
            IssueKind::DependencyRisk => "overly bonding phrases",
        }
    }

    /// Recover the kind from a tagged issue string ("code: detail")
    pub fn from_signature(tagged: &str) -> Option<Self> {
        let code = tagged.split(':').next().unwrap_or_default().trim();
        [
            IssueKind::ContextDrift,
            IssueKind::QuestionOverload,
            IssueKind::Verbosity,
            IssueKind::CoachTone,
            IssueKind::FalsePersona,
            IssueKind::DependencyRisk,
        ]
        .into_iter()
        .find(|k| k.code() == code)
    }
}

/// One triggered rule with the spans that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticIssue {
    pub kind: IssueKind,
    /// Matched spans from the draft (empty for count-based rules)
    pub matches: Vec<String>,
}

impl CriticIssue {
    pub fn new(kind: IssueKind) -> Self {
        Self { kind, matches: Vec::new() }
    }

    pub fn with_matches(kind: IssueKind, matches: Vec<String>) -> Self {
        Self { kind, matches }
    }
}

impl std::fmt::Display for CriticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.matches.is_empty() {
            write!(f, "{}: {}", self.kind.code(), self.kind.description())
        } else {
            write!(
                f,
                "{}: {} ({})",
                self.kind.code(),
                self.kind.description(),
                self.matches.join(", ")
            )
        }
    }
}

/// Result of one critic pass. `pass == (severity != High)` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticResult {
    pub pass: bool,
    pub issues: Vec<CriticIssue>,
    pub severity: Severity,
}

impl CriticResult {
    /// Build from triggered issues; severity and pass are derived
    pub fn from_issues(issues: Vec<CriticIssue>) -> Self {
        let severity = issues
            .iter()
            .map(|i| i.kind.severity())
            .max()
            .unwrap_or(Severity::Low);
        Self {
            pass: severity != Severity::High,
            issues,
            severity,
        }
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Tagged issue strings, matched spans included
    pub fn tagged(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }

    /// Issue signatures only (no draft text)
    pub fn signatures(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.kind.code().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_issues_pass_low() {
        let r = CriticResult::from_issues(vec![]);
        assert!(r.pass);
        assert_eq!(r.severity, Severity::Low);
    }

    #[test]
    fn test_medium_only_still_passes() {
        let r = CriticResult::from_issues(vec![
            CriticIssue::new(IssueKind::Verbosity),
            CriticIssue::new(IssueKind::DependencyRisk),
        ]);
        assert!(r.pass);
        assert_eq!(r.severity, Severity::Medium);
    }

    #[test]
    fn test_any_high_fails() {
        let r = CriticResult::from_issues(vec![
            CriticIssue::new(IssueKind::Verbosity),
            CriticIssue::new(IssueKind::QuestionOverload),
        ]);
        assert!(!r.pass);
        assert_eq!(r.severity, Severity::High);
    }

    #[test]
    fn test_tagged_format_and_signature_parse() {
        let issue = CriticIssue::with_matches(IssueKind::CoachTone, vec!["roadmap".into()]);
        let s = issue.to_string();
        assert!(s.starts_with("coach_tone: "));
        assert!(s.contains("(roadmap)"));
        assert_eq!(IssueKind::from_signature(&s), Some(IssueKind::CoachTone));
        assert_eq!(IssueKind::from_signature("nonsense: x"), None);
    }
}
