//! External model seam
//!
//! Classification and text generation are the only operations that can
//! block or fail. Both sit behind narrow async traits; every call is
//! wrapped in a timeout that counts as a failure.

use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use crate::error::{ClassificationError, GenerationError};
use crate::types::{Classification, EmotionReading, Intent, Role};

/// What a generation request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Draft,
    Rewrite,
    Compress,
    ReduceMoves,
}

/// Instructions plus the text to work on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    pub instructions: String,
    pub input: String,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify_intent(&self, text: &str, role: Role) -> Result<Intent, ClassificationError>;

    async fn classify_emotion(&self, text: &str) -> Result<EmotionReading, ClassificationError>;
}

/// Run one generation under a timeout. Empty output counts as a failure.
pub async fn generate_with_timeout(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
    limit: Duration,
) -> Result<String, GenerationError> {
    match timeout(limit, generator.generate(request)).await {
        Ok(Ok(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Err(GenerationError::Failed("empty output".to_string()))
            } else {
                Ok(text.to_string())
            }
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(GenerationError::Timeout(limit)),
    }
}

pub async fn classify_intent_with_timeout(
    classifier: &dyn Classifier,
    text: &str,
    role: Role,
    limit: Duration,
) -> Result<Intent, ClassificationError> {
    timeout(limit, classifier.classify_intent(text, role))
        .await
        .map_err(|_| ClassificationError::Timeout(limit))?
}

pub async fn classify_emotion_with_timeout(
    classifier: &dyn Classifier,
    text: &str,
    limit: Duration,
) -> Result<EmotionReading, ClassificationError> {
    timeout(limit, classifier.classify_emotion(text))
        .await
        .map_err(|_| ClassificationError::Timeout(limit))?
}

// =============================================================================
// Built-in collaborators
// =============================================================================

/// No model attached: every call fails, so each site takes its fallback
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable)
    }
}

/// Serves a caller-supplied draft; edit requests are unavailable
#[derive(Debug, Clone)]
pub struct SuppliedDraft {
    draft: String,
}

impl SuppliedDraft {
    pub fn new(draft: impl Into<String>) -> Self {
        Self { draft: draft.into() }
    }
}

#[async_trait]
impl TextGenerator for SuppliedDraft {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        match request.kind {
            GenerationKind::Draft => Ok(self.draft.clone()),
            _ => Err(GenerationError::Unavailable),
        }
    }
}

/// Returns a fixed classification for every message
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    classification: Classification,
}

impl FixedClassifier {
    pub fn new(classification: Classification) -> Self {
        Self { classification }
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify_intent(&self, _text: &str, _role: Role) -> Result<Intent, ClassificationError> {
        Ok(self.classification.intent.clone())
    }

    async fn classify_emotion(&self, _text: &str) -> Result<EmotionReading, ClassificationError> {
        Ok(EmotionReading {
            detected_emotion: self.classification.detected_emotion,
            maturity_risk_level: self.classification.maturity_risk_level,
        })
    }
}
