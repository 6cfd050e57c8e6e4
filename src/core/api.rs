//! HTTP API for Turnguard
//!
//! Diagnostic surface over the core, not the chat transport.
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /evaluate - Critic + CSS + stage + pacing for a user text and draft
//! - POST /turn - Run the pipeline with a supplied classification and draft
//! - GET /session/{id} - Stored session state

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::core::critic::SelfCritic;
use crate::core::css::{CssInputs, CssScorer};
use crate::core::generator::SuppliedDraft;
use crate::core::moves::MoveDetector;
use crate::core::pacing::select_profile;
use crate::core::pipeline::TurnPipeline;
use crate::core::stage::StageEstimator;
use crate::core::store::SessionStore;
use crate::error::TurnError;
use crate::types::{
    Classification, CriticResult, CssResult, Emotion, PacingProfile, RiskLevel, Role, Route,
    SessionState, StageEstimate, TurnOutcome, TurnRequest,
};

/// App state
pub struct AppState {
    /// Store, config and sink shared by every request
    pub pipeline: TurnPipeline,
}

/// Evaluate request
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub user_text: String,
    pub draft: String,
    #[serde(default = "default_emotion")]
    pub emotion: Emotion,
    #[serde(default = "default_risk")]
    pub risk: RiskLevel,
    #[serde(default = "default_role")]
    pub role: Role,
}

/// Evaluate response
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub critic: CriticResult,
    pub css: CssResult,
    pub stage: StageEstimate,
    pub pacing: PacingProfile,
    pub moves: Vec<&'static str>,
}

/// Turn request with the classification and draft supplied by the caller
#[derive(Debug, Deserialize)]
pub struct TurnBody {
    pub user_id: String,
    pub text: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub route: Route,
    pub classification: Classification,
    pub draft: String,
    /// Fixes sentence selection for reproducible runs
    pub seed: Option<u64>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ruleset_version: String,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn default_emotion() -> Emotion {
    Emotion::Confusion
}

fn default_risk() -> RiskLevel {
    RiskLevel::Medium
}

fn default_role() -> Role {
    Role::Staff
}

/// Create the API router
pub fn create_router(pipeline: TurnPipeline) -> Router {
    let state = Arc::new(AppState { pipeline });

    Router::new()
        .route("/health", get(health))
        .route("/evaluate", post(evaluate))
        .route("/turn", post(run_turn))
        .route("/session/:id", get(get_session))
        .with_state(state)
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        ruleset_version: crate::RULESET_VERSION.to_string(),
    })
}

/// Score a draft against the current rules without touching session state
async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Json<EvaluateResponse> {
    let config = state.pipeline.config().load().await;
    let stage = StageEstimator::new().estimate(&req.user_text, req.emotion);
    let pacing = select_profile(stage.stage, req.role, req.risk);
    let critic = SelfCritic::new(&config).criticize(&req.user_text, &req.draft, pacing.max_sentences);
    let css = CssScorer::new().score(
        &req.draft,
        &CssInputs { profile: Some(&pacing), ..Default::default() },
        false,
    );

    Json(EvaluateResponse {
        critic,
        css,
        stage,
        pacing,
        moves: MoveDetector::new().moves(&req.draft),
    })
}

/// Run one turn through the pipeline
async fn run_turn(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TurnBody>,
) -> Result<Json<TurnOutcome>, (StatusCode, Json<ErrorResponse>)> {
    let pipeline = state
        .pipeline
        .clone()
        .with_generator(Arc::new(SuppliedDraft::new(body.draft)));
    let req = TurnRequest {
        user_id: body.user_id,
        text: body.text,
        role: body.role,
        route: body.route,
    };
    let mut rng = match body.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    pipeline
        .run_turn_with_classification(&req, body.classification, &mut rng)
        .await
        .map(Json)
        .map_err(|e| {
            let status = match e {
                TurnError::EmptyInput => StatusCode::BAD_REQUEST,
                TurnError::Draft(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(ErrorResponse { error: e.to_string() }))
        })
}

/// Get stored session state
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionState>, StatusCode> {
    state.pipeline.store().get(&id).await.map(Json).map_err(|e| {
        warn!(error = %e, "session lookup failed");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

/// Run the API server
pub async fn run_server(addr: &str, pipeline: TurnPipeline) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(pipeline);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Turnguard API running on {}", addr);
    println!("  GET  /health       - Health check");
    println!("  POST /evaluate     - Critic + CSS for a draft");
    println!("  POST /turn         - Run one turn");
    println!("  GET  /session/:id  - Session state");
    axum::serve(listener, router).await?;
    Ok(())
}
