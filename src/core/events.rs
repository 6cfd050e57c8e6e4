//! Quality event sinks
//!
//! Events carry issue signatures, severity, CSS, route and intent. They
//! never carry conversational text; the user is referenced by a hash.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use crate::error::SinkError;
use crate::types::{
    CriticResult, IntentKind, QualityEvent, Role, Route, Severity, LOW_CSS_SIGNATURE,
};
use crate::{CSS_QUALITY_EVENT_THRESHOLD, CSS_SILENCE_THRESHOLD};

/// Hex prefix of SHA-256(user_id)
pub fn user_ref(user_id: &str) -> String {
    let digest = Sha256::digest(user_id.as_bytes());
    digest.iter().take(8).map(|b| format!("{:02x}", b)).collect()
}

/// Who and where, shared by every event of one turn
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    pub user_id: &'a str,
    pub role: Role,
    pub intent: IntentKind,
    pub route: Route,
}

impl EventContext<'_> {
    fn event(&self, issues: Vec<String>, severity: Severity, css_score: Option<u32>) -> QualityEvent {
        QualityEvent {
            timestamp: Utc::now(),
            user_ref: user_ref(self.user_id),
            role: self.role,
            intent: self.intent,
            issues,
            severity,
            css_score,
            route: self.route,
        }
    }
}

/// Event for a failed first critic pass
pub fn critic_failure_event(ctx: &EventContext<'_>, critic: &CriticResult) -> QualityEvent {
    ctx.event(critic.signatures(), critic.severity, None)
}

/// Event for a low final CSS; None above the threshold
pub fn low_css_event(ctx: &EventContext<'_>, css: u32) -> Option<QualityEvent> {
    if css > CSS_QUALITY_EVENT_THRESHOLD {
        return None;
    }
    let (issues, severity) = if css <= CSS_SILENCE_THRESHOLD {
        (vec![LOW_CSS_SIGNATURE.to_string()], Severity::High)
    } else {
        (Vec::new(), Severity::Medium)
    };
    Some(ctx.event(issues, severity, Some(css)))
}

#[async_trait]
pub trait QualityEventSink: Send + Sync {
    async fn record(&self, event: &QualityEvent) -> Result<(), SinkError>;
}

/// Record without ever failing the turn
pub async fn emit(sink: &dyn QualityEventSink, event: &QualityEvent) {
    if let Err(e) = sink.record(event).await {
        warn!(error = %e, "quality event dropped");
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Logs each event at info
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl QualityEventSink for TracingSink {
    async fn record(&self, event: &QualityEvent) -> Result<(), SinkError> {
        info!(
            user_ref = %event.user_ref,
            role = event.role.as_str(),
            intent = event.intent.as_str(),
            issues = ?event.issues,
            severity = event.severity.as_str(),
            css = ?event.css_score,
            route = ?event.route,
            "quality event"
        );
        Ok(())
    }
}

/// Appends one JSON line per event
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QualityEventSink for JsonlSink {
    async fn record(&self, event: &QualityEvent) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

/// Keeps events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<QualityEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<QualityEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QualityEventSink for MemorySink {
    async fn record(&self, event: &QualityEvent) -> Result<(), SinkError> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
