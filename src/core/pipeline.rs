//! Turn pipeline
//!
//! One sequential pass per user turn:
//!   classify → dependency check → stage → pacing → early silence check
//!   → reflection + draft
//!   → self-critic → constrained rewrite → guardrails → CSS
//!   → late silence check → session update
//!
//! Only a failed draft call surfaces as an error. Every other failure is
//! absorbed by its call site's fallback.

use std::sync::Arc;
use std::time::Duration;
use rand::Rng;
use tracing::{debug, info, warn};
use crate::core::config::{ConfigProvider, StaticConfig};
use crate::core::critic::SelfCritic;
use crate::core::dependency::check_dependency;
use crate::core::css::{CssInputs, CssScorer};
use crate::core::events::{
    critic_failure_event, emit, low_css_event, EventContext, QualityEventSink, TracingSink,
};
use crate::core::generator::{
    classify_emotion_with_timeout, classify_intent_with_timeout, generate_with_timeout, Classifier,
    TextGenerator,
};
use crate::core::guardrail::GuardrailProcessor;
use crate::core::pacing::select_profile;
use crate::core::prompts::draft_request;
use crate::core::reflection::{reflection_category, select_reflection};
use crate::core::rewriter::ConstrainedRewriter;
use crate::core::silence::{SilenceContext, SilenceEngine};
use crate::core::stage::StageEstimator;
use crate::core::store::{load_state, save_patch, SessionStore};
use crate::core::updater::{record_dependency, reply_signals, silence_patch, spoken_patch};
use crate::error::TurnError;
use crate::types::{
    Classification, CssResult, EmotionReading, Intent, SilencePass, TurnOutcome, TurnPath,
    TurnRequest,
};
use crate::DEFAULT_CALL_TIMEOUT_MS;

#[derive(Clone)]
pub struct TurnPipeline {
    config: Arc<dyn ConfigProvider>,
    store: Arc<dyn SessionStore>,
    classifier: Arc<dyn Classifier>,
    generator: Arc<dyn TextGenerator>,
    sink: Arc<dyn QualityEventSink>,
    call_timeout: Duration,
}

impl TurnPipeline {
    /// Base rules, tracing sink, default timeout
    pub fn new(
        store: Arc<dyn SessionStore>,
        classifier: Arc<dyn Classifier>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            config: Arc::new(StaticConfig::default()),
            store,
            classifier,
            generator,
            sink: Arc::new(TracingSink),
            call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
        }
    }

    pub fn with_config(mut self, config: Arc<dyn ConfigProvider>) -> Self {
        self.config = config;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn QualityEventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Classify with safe defaults on any failure
    pub async fn classify(&self, req: &TurnRequest) -> Classification {
        let intent = classify_intent_with_timeout(
            self.classifier.as_ref(),
            &req.text,
            req.role,
            self.call_timeout,
        )
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "intent classification failed, using defaults");
            Intent::safe_default()
        });

        let reading = classify_emotion_with_timeout(self.classifier.as_ref(), &req.text, self.call_timeout)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "emotion classification failed, using defaults");
                EmotionReading::safe_default()
            });

        Classification::new(reading, intent)
    }

    pub async fn run_turn<R: Rng + Send + ?Sized>(
        &self,
        req: &TurnRequest,
        rng: &mut R,
    ) -> Result<TurnOutcome, TurnError> {
        if req.text.trim().is_empty() {
            return Err(TurnError::EmptyInput);
        }
        let classification = self.classify(req).await;
        self.run_turn_with_classification(req, classification, rng).await
    }

    /// Run a turn whose classification is already known
    pub async fn run_turn_with_classification<R: Rng + Send + ?Sized>(
        &self,
        req: &TurnRequest,
        classification: Classification,
        rng: &mut R,
    ) -> Result<TurnOutcome, TurnError> {
        if req.text.trim().is_empty() {
            return Err(TurnError::EmptyInput);
        }

        let config = self.config.load().await;
        let state = load_state(self.store.as_ref(), &req.user_id).await;
        let dependency = check_dependency(state.dependency_flag, &req.text);
        if dependency.reduce_warmth {
            info!(flag = dependency.flag, "dependency flag high, redirecting toward real-world support");
        }
        let emotion = classification.detected_emotion;
        let risk = classification.maturity_risk_level;

        let stage = StageEstimator::new().estimate(&req.text, emotion);
        let pacing = select_profile(stage.stage, req.role, risk);
        debug!(stage = stage.stage.as_str(), max_sentences = pacing.max_sentences, "pacing selected");

        let engine = SilenceEngine::new();
        let ctx = SilenceContext::before_generation(
            &req.text,
            emotion,
            risk,
            state.previous_was_question,
            state.previous_was_silence,
        );
        let mut silence_history = state.last_silence_indices.clone();

        // Early exit before any generation
        let (early, picked) =
            engine.decide(&ctx, SilencePass::PreGeneration, &mut silence_history, rng);
        if let Some(picked) = picked {
            let mut patch = silence_patch(&picked.sentence, &silence_history);
            record_dependency(&mut patch, &dependency);
            save_patch(self.store.as_ref(), &req.user_id, &patch).await;
            info!(reason = early.reason.code(), index = picked.index, "early silence");
            return Ok(TurnOutcome {
                reply: picked.sentence,
                path: TurnPath::EarlySilence,
                classification,
                stage,
                pacing,
                silence: early,
                critic: None,
                rewrite: None,
                guardrail: None,
                css: CssResult::silent(),
                dependency,
            });
        }

        // Reflection + draft
        let mut reflections = state.last_reflection_templates.clone();
        let reflection = select_reflection(
            &classification.intent.key_point,
            reflection_category(emotion, classification.intent.intent),
            &mut reflections,
            rng,
        );
        let request = draft_request(
            &pacing,
            &config,
            &dependency,
            &req.text,
            &classification.intent.key_point,
        );
        let content = generate_with_timeout(self.generator.as_ref(), &request, self.call_timeout)
            .await
            .map_err(TurnError::Draft)?;
        let draft = format!("{} {}", reflection.text, content);

        // Critic, then rewrite when failing
        let events = EventContext {
            user_id: &req.user_id,
            role: req.role,
            intent: classification.intent.intent,
            route: req.route,
        };
        let critic = SelfCritic::new(&config).criticize(&req.text, &draft, pacing.max_sentences);
        let (text, rewrite) = if critic.pass {
            (draft, None)
        } else {
            info!(issues = ?critic.signatures(), "critic failed, rewriting");
            emit(self.sink.as_ref(), &critic_failure_event(&events, &critic)).await;
            let outcome = ConstrainedRewriter::new(&config, self.generator.as_ref(), self.call_timeout)
                .rewrite(&req.text, &draft, &critic, pacing.max_sentences, rng)
                .await;
            (outcome.text.clone(), Some(outcome))
        };

        let guardrail = GuardrailProcessor::new(&config, self.generator.as_ref(), self.call_timeout)
            .apply(&text)
            .await;
        let reply = guardrail.text.clone();

        let signals = reply_signals(&state, &reply);
        let css = CssScorer::new().score(
            &reply,
            &CssInputs {
                tone_drift: state.tone_drift,
                emotion_overprocessing: signals.emotion_overprocessing,
                profile: Some(&pacing),
            },
            false,
        );
        if let Some(event) = low_css_event(&events, css.css) {
            emit(self.sink.as_ref(), &event).await;
        }

        // Late check with the real CSS may only turn speech into silence
        let (late, picked) = engine.decide(
            &ctx.with_css(css.css),
            SilencePass::PostGeneration,
            &mut silence_history,
            rng,
        );
        if let Some(picked) = picked {
            let mut patch = silence_patch(&picked.sentence, &silence_history);
            record_dependency(&mut patch, &dependency);
            save_patch(self.store.as_ref(), &req.user_id, &patch).await;
            info!(reason = late.reason.code(), css = css.css, "late silence, draft discarded");
            return Ok(TurnOutcome {
                reply: picked.sentence,
                path: TurnPath::LateSilence,
                classification,
                stage,
                pacing,
                silence: late,
                critic: Some(critic),
                rewrite,
                guardrail: Some(guardrail),
                css: CssResult::silent(),
                dependency,
            });
        }

        let mut patch = spoken_patch(&state, &reply, &signals, &reflections);
        record_dependency(&mut patch, &dependency);
        save_patch(self.store.as_ref(), &req.user_id, &patch).await;
        info!(css = css.css, critic_pass = critic.pass, guardrail_actions = guardrail.actions.len(), "turn spoken");

        Ok(TurnOutcome {
            reply,
            path: TurnPath::Spoken,
            classification,
            stage,
            pacing,
            silence: late,
            critic: Some(critic),
            rewrite,
            guardrail: Some(guardrail),
            css,
            dependency,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
