//! Integration tests for the turn pipeline
//!
//! Tests the full path: classification → silence → draft → critic → rewrite
//! → guardrails → CSS → late silence → session store, with stubbed models.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use turnguard::core::library::{library_len, sentence_at};
use turnguard::core::{
    FileConfigProvider, FixedClassifier, JsonFileStore, MemorySink, MemoryStore, SessionStore,
    SuppliedDraft, TurnPipeline, UnavailableStore,
};
use turnguard::types::{
    Classification, CssResult, Emotion, EmotionReading, Intent, RiskLevel, Role, Severity,
    SilenceReason, TurnPath, TurnRequest, LOW_CSS_SIGNATURE,
};

const USER_TEXT: &str = "My manager ignored my proposal in the meeting today";
const CLEAN_DRAFT: &str = "Being ignored in the meeting by your manager hurt.";

fn classification(emotion: Emotion, risk: RiskLevel) -> Classification {
    Classification::new(
        EmotionReading { detected_emotion: emotion, maturity_risk_level: risk },
        Intent::safe_default(),
    )
}

fn calm() -> Classification {
    classification(Emotion::Confusion, RiskLevel::Low)
}

fn pipeline(store: Arc<dyn SessionStore>, sink: Arc<MemorySink>) -> TurnPipeline {
    TurnPipeline::new(
        store,
        Arc::new(FixedClassifier::new(calm())),
        Arc::new(SuppliedDraft::new(CLEAN_DRAFT)),
    )
    .with_sink(sink)
    .with_call_timeout(Duration::from_secs(1))
}

fn with_draft(p: &TurnPipeline, draft: &str) -> TurnPipeline {
    p.clone().with_generator(Arc::new(SuppliedDraft::new(draft)))
}

fn is_library_sentence(text: &str) -> bool {
    (0..library_len()).any(|i| sentence_at(i) == Some(text))
}

/// A clean draft is delivered behind a one-sentence reflection
#[tokio::test]
async fn test_spoken_turn_keeps_draft_behind_reflection() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let p = pipeline(store.clone(), sink.clone());
    let mut rng = StdRng::seed_from_u64(1);

    let out = p.run_turn(&TurnRequest::new("u1", USER_TEXT, Role::Staff), &mut rng).await.unwrap();

    assert_eq!(out.path, TurnPath::Spoken);
    assert!(out.reply.starts_with("사용자의 말씀"));
    assert!(out.reply.ends_with(CLEAN_DRAFT));
    assert!(!out.reply.contains('?'));
    assert!(out.critic.as_ref().unwrap().pass);
    assert!(out.rewrite.is_none());
    assert!(out.guardrail.as_ref().unwrap().actions.is_empty());
    assert_eq!(out.css.css, 5);
    assert!(sink.events().is_empty());

    let state = store.get("u1").await.unwrap();
    assert!(!state.previous_was_silence);
    assert!(!state.previous_was_question);
    assert_eq!(state.last_reflection_templates.len(), 1);
    assert!(state.last_updated.is_some());
}

/// A question in one reply silences the next turn after generation
#[tokio::test]
async fn test_previous_question_triggers_late_silence() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let p = pipeline(store.clone(), sink.clone());
    let req = TurnRequest::new("u2", USER_TEXT, Role::Staff);
    let mut rng = StdRng::seed_from_u64(2);

    let asking = with_draft(&p, "Being ignored in the meeting by your manager hurt. What stayed with you most?");
    let first = asking.run_turn(&req, &mut rng).await.unwrap();
    assert_eq!(first.path, TurnPath::Spoken);
    assert!(store.get("u2").await.unwrap().previous_was_question);

    let second = p.run_turn(&req, &mut rng).await.unwrap();
    assert_eq!(second.path, TurnPath::LateSilence);
    assert_eq!(second.silence.reason, SilenceReason::S004_PREVIOUS_WAS_QUESTION);
    assert!(is_library_sentence(&second.reply));
    assert_eq!(second.css, CssResult::silent());

    let state = store.get("u2").await.unwrap();
    assert!(state.previous_was_silence);
    assert!(!state.previous_was_question);
    assert_eq!(state.last_silence_indices.len(), 1);

    // Never two silent turns in a row
    let third = p.run_turn(&req, &mut rng).await.unwrap();
    assert_eq!(third.path, TurnPath::Spoken);
}

/// Low CSS flips speech into silence and records a high-severity event
#[tokio::test]
async fn test_low_css_late_silence_and_event() {
    let sink = Arc::new(MemorySink::new());
    let p = pipeline(Arc::new(MemoryStore::new()), sink.clone());
    let rambling = with_draft(
        &p,
        "Being ignored in the meeting by your manager hurt. It was public. It was sudden. It stung. It lingers.",
    );
    let mut rng = StdRng::seed_from_u64(3);

    let out = rambling.run_turn(&TurnRequest::new("u3", USER_TEXT, Role::Staff), &mut rng).await.unwrap();

    assert_eq!(out.path, TurnPath::LateSilence);
    assert_eq!(out.silence.reason, SilenceReason::S003_LOW_CSS);
    assert!(out.critic.as_ref().unwrap().pass);
    assert!(is_library_sentence(&out.reply));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].issues, vec![LOW_CSS_SIGNATURE.to_string()]);
    assert_eq!(events[0].severity, Severity::High);
    assert!(events[0].css_score.unwrap() <= 2);
}

/// A failing draft is rewritten or replaced; the event never carries text
#[tokio::test]
async fn test_critic_failure_falls_back_and_records_signatures() {
    let sink = Arc::new(MemorySink::new());
    let p = pipeline(Arc::new(MemoryStore::new()), sink.clone());
    let bad = with_draft(&p, "제 경험으로는 괜찮아요? 정말요?");
    let mut rng = StdRng::seed_from_u64(4);

    let out = bad.run_turn(&TurnRequest::new("u4", USER_TEXT, Role::Staff), &mut rng).await.unwrap();

    let rewrite = out.rewrite.as_ref().unwrap();
    assert!(rewrite.persona_sanitized);
    assert!(rewrite.rewrite_call_failed);
    assert!(!out.reply.contains("제 경험"));

    let events = sink.events();
    let critic_event = &events[0];
    assert!(critic_event.issues.contains(&"false_persona".to_string()));
    assert!(critic_event.issues.contains(&"question_overload".to_string()));
    assert_eq!(critic_event.css_score, None);
    for event in &events {
        let json = serde_json::to_string(event).unwrap();
        assert!(!json.contains("경험"));
        assert!(!json.contains("manager"));
        assert!(!json.contains("u4"));
    }
}

/// High risk never reaches the generator
#[tokio::test]
async fn test_high_risk_skips_generation() {
    let store = Arc::new(MemoryStore::new());
    let p = pipeline(store.clone(), Arc::new(MemorySink::new()))
        .with_generator(Arc::new(turnguard::core::OfflineGenerator));
    let mut rng = StdRng::seed_from_u64(5);
    let req = TurnRequest::new("u5", USER_TEXT, Role::Leader);

    let out = p
        .run_turn_with_classification(&req, classification(Emotion::Fear, RiskLevel::High), &mut rng)
        .await
        .unwrap();

    assert_eq!(out.path, TurnPath::EarlySilence);
    assert_eq!(out.silence.reason, SilenceReason::S001_HIGH_RISK);
    assert_eq!(out.silence.selected_sentence.as_deref(), Some(out.reply.as_str()));
    assert_eq!(out.pacing.max_sentences, 2);
    assert!(!out.pacing.allow_question);
    assert!(out.critic.is_none());
}

/// Without a store every turn starts from the default state
#[tokio::test]
async fn test_unavailable_store_stays_conservative() {
    let p = pipeline(Arc::new(UnavailableStore), Arc::new(MemorySink::new()));
    let mut rng = StdRng::seed_from_u64(6);
    let req = TurnRequest::new("u6", USER_TEXT, Role::Staff);
    let high = classification(Emotion::Fear, RiskLevel::High);

    // The no-two-silences gate cannot apply without state
    for _ in 0..2 {
        let out = p.run_turn_with_classification(&req, high.clone(), &mut rng).await.unwrap();
        assert_eq!(out.path, TurnPath::EarlySilence);
    }
    let spoken = p.run_turn(&req, &mut rng).await.unwrap();
    assert_eq!(spoken.path, TurnPath::Spoken);
}

/// Session files survive a new pipeline over the same directory
#[tokio::test]
async fn test_json_store_carries_state_between_pipelines() {
    let dir = tempfile::tempdir().unwrap();
    let req = TurnRequest::new("u7", USER_TEXT, Role::Staff);
    let high = classification(Emotion::Fear, RiskLevel::High);
    let mut rng = StdRng::seed_from_u64(7);

    let first = pipeline(Arc::new(JsonFileStore::new(dir.path())), Arc::new(MemorySink::new()));
    let out = first.run_turn_with_classification(&req, high.clone(), &mut rng).await.unwrap();
    assert!(out.path.is_silent());

    let second = pipeline(Arc::new(JsonFileStore::new(dir.path())), Arc::new(MemorySink::new()));
    let out = second.run_turn_with_classification(&req, high, &mut rng).await.unwrap();
    assert_eq!(out.path, TurnPath::Spoken);
    assert_eq!(out.silence.reason, SilenceReason::S000_PREVIOUS_WAS_SILENCE);
}

/// Rule edits on disk apply on the very next turn
#[tokio::test]
async fn test_config_file_reloaded_each_turn() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, "{}").unwrap();

    let sink = Arc::new(MemorySink::new());
    let p = pipeline(Arc::new(MemoryStore::new()), sink.clone())
        .with_config(Arc::new(FileConfigProvider::new(&path)));
    let draft = "Being ignored in the meeting by your manager hurt, a real setback.";
    let p = with_draft(&p, draft);
    let mut rng = StdRng::seed_from_u64(8);

    let out = p.run_turn(&TurnRequest::new("a", USER_TEXT, Role::Staff), &mut rng).await.unwrap();
    assert!(out.reply.ends_with(draft));
    assert!(sink.events().is_empty());

    std::fs::write(&path, r#"{"banned_phrases": ["setback"]}"#).unwrap();

    let out = p.run_turn(&TurnRequest::new("b", USER_TEXT, Role::Staff), &mut rng).await.unwrap();
    assert!(!out.reply.contains("setback"));
    assert!(!out.critic.as_ref().unwrap().pass);
    assert_eq!(sink.events()[0].issues, vec!["coach_tone".to_string()]);
}
