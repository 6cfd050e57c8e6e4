//! Constrained rewriter
//!
//! sanitize → one rewrite call → re-validate → library fallback.
//! At most one external call; always ends in a passing text.

use std::time::Duration;
use rand::Rng;
use tracing::{info, warn};
use crate::core::config::RuleConfig;
use crate::core::critic::SelfCritic;
use crate::core::generator::{generate_with_timeout, TextGenerator};
use crate::core::library::random_sentence;
use crate::core::prompts::rewrite_request;
use crate::types::{CriticResult, IssueKind, RewriteOutcome, RewriteResolution};

/// Replace every false-persona match with the neutral replacement phrase
pub fn sanitize_false_persona(draft: &str, config: &RuleConfig) -> String {
    let mut out = draft.to_string();
    for pattern in &config.false_persona_patterns {
        if let Some(re) = pattern.regex() {
            out = re
                .replace_all(&out, config.false_persona_replacement.as_str())
                .into_owned();
        }
    }
    out
}

pub struct ConstrainedRewriter<'a> {
    config: &'a RuleConfig,
    generator: &'a dyn TextGenerator,
    call_timeout: Duration,
}

impl<'a> ConstrainedRewriter<'a> {
    pub fn new(config: &'a RuleConfig, generator: &'a dyn TextGenerator, call_timeout: Duration) -> Self {
        Self { config, generator, call_timeout }
    }

    /// Repair a draft the critic rejected. The sentence cap is the tighter
    /// of the pacing cap and the configured rewrite constraint.
    pub async fn rewrite<R: Rng + Send + ?Sized>(
        &self,
        user_text: &str,
        draft: &str,
        critic: &CriticResult,
        max_sentences: usize,
        rng: &mut R,
    ) -> RewriteOutcome {
        let max_sentences = max_sentences.min(self.config.rewrite_constraints.max_sentences);
        let persona_sanitized = critic.has(IssueKind::FalsePersona);
        let working = if persona_sanitized {
            sanitize_false_persona(draft, self.config)
        } else {
            draft.to_string()
        };

        let request = rewrite_request(critic, self.config, max_sentences, user_text, &working);
        let (candidate, rewrite_call_failed) =
            match generate_with_timeout(self.generator, &request, self.call_timeout).await {
                Ok(text) => (text, false),
                Err(e) => {
                    warn!(error = %e, "rewrite call failed, keeping pre-call draft");
                    (working, true)
                }
            };

        let recheck = SelfCritic::new(self.config).criticize(user_text, &candidate, max_sentences);
        if recheck.pass {
            return RewriteOutcome {
                text: candidate,
                resolution: RewriteResolution::Rewritten,
                persona_sanitized,
                rewrite_call_failed,
                final_critic: recheck,
            };
        }

        info!(
            issues = ?recheck.signatures(),
            "critic still failing after rewrite, using library sentence"
        );
        let fallback = random_sentence(rng).to_string();
        let final_critic = SelfCritic::new(self.config).criticize(user_text, &fallback, max_sentences);
        RewriteOutcome {
            text: fallback,
            resolution: RewriteResolution::LibraryFallback,
            persona_sanitized,
            rewrite_call_failed,
            final_critic,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::core::generator::{GenerationKind, GenerationRequest, OfflineGenerator};
    use crate::core::library::{library_len, sentence_at};
    use crate::error::GenerationError;

    /// Records requests and answers with a canned reply
    struct Recording {
        reply: String,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait]
    impl TextGenerator for Recording {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_sanitize_replaces_every_match() {
        let config = RuleConfig::default();
        let out = sanitize_false_persona("제 경험상 그래요. 내 경험도 그래요.", &config);
        assert!(!out.contains("경험"));
        assert_eq!(out.matches(config.false_persona_replacement.as_str()).count(), 2);
    }

    #[tokio::test]
    async fn test_sanitizes_before_calling_out() {
        let config = RuleConfig::default();
        let generator = Recording {
            reply: "팀장님 말에 마음이 많이 상하셨네요.".to_string(),
            seen: Mutex::new(Vec::new()),
        };
        let draft = "제 경험으로는 괜찮아요? 정말요?";
        let critic = SelfCritic::new(&config).criticize("", draft, 3);
        assert!(critic.has(IssueKind::FalsePersona));

        let rewriter = ConstrainedRewriter::new(&config, &generator, Duration::from_secs(1));
        let mut rng = StdRng::seed_from_u64(0);
        let out = rewriter.rewrite("", draft, &critic, 3, &mut rng).await;

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, GenerationKind::Rewrite);
        assert!(!seen[0].input.contains("제 경험"));
        assert!(seen[0].input.contains(&config.false_persona_replacement));
        assert_eq!(out.resolution, RewriteResolution::Rewritten);
        assert!(out.persona_sanitized);
    }

    #[tokio::test]
    async fn test_rewrite_constraint_tightens_sentence_cap() {
        let overrides = crate::core::config::ConfigOverrides::from_json(
            r#"{"rewrite_constraints": {"max_sentences": 1}}"#,
        )
        .unwrap();
        let config = RuleConfig::with_overrides(&overrides);
        let generator = Recording {
            reply: "마음이 많이 상하셨네요.".to_string(),
            seen: Mutex::new(Vec::new()),
        };
        let draft = "Why? How? Really?";
        let critic = SelfCritic::new(&config).criticize("", draft, 3);
        let mut rng = StdRng::seed_from_u64(1);
        ConstrainedRewriter::new(&config, &generator, Duration::from_secs(1))
            .rewrite("", draft, &critic, 3, &mut rng)
            .await;

        let seen = generator.seen.lock().unwrap();
        assert!(seen[0].instructions.contains("Max 1 sentences"));
        assert!(!seen[0].instructions.contains("Max 3 sentences"));
    }

    #[tokio::test]
    async fn test_failed_rewrite_falls_back_to_library() {
        let config = RuleConfig::default();
        let draft = "Why? How? Really?";
        let critic = SelfCritic::new(&config).criticize("", draft, 3);
        let rewriter = ConstrainedRewriter::new(&config, &OfflineGenerator, Duration::from_secs(1));
        let mut rng = StdRng::seed_from_u64(5);
        let out = rewriter.rewrite("", draft, &critic, 3, &mut rng).await;

        assert!(out.rewrite_call_failed);
        assert_eq!(out.resolution, RewriteResolution::LibraryFallback);
        assert!((0..library_len()).any(|i| sentence_at(i) == Some(out.text.as_str())));
        assert!(out.final_critic.pass);
    }

    #[tokio::test]
    async fn test_call_failure_keeps_sanitized_draft_when_it_passes() {
        let config = RuleConfig::default();
        let draft = "제 경험으로는 괜찮아질 거예요.";
        let critic = SelfCritic::new(&config).criticize("", draft, 3);
        let rewriter = ConstrainedRewriter::new(&config, &OfflineGenerator, Duration::from_secs(1));
        let mut rng = StdRng::seed_from_u64(5);
        let out = rewriter.rewrite("", draft, &critic, 3, &mut rng).await;

        assert_eq!(out.resolution, RewriteResolution::Rewritten);
        assert!(out.text.starts_with(config.false_persona_replacement.as_str()));
    }
}
