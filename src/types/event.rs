//! Quality events: text-free records of contract trouble

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::{IntentKind, Role, Severity};

/// Surface the turn arrived through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    #[default]
    Web,
    Teams,
    App,
}

/// Signature used when the event is raised for a low final CSS
pub const LOW_CSS_SIGNATURE: &str = "low_css_score";

/// Append-only quality record. Never carries conversational text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityEvent {
    pub timestamp: DateTime<Utc>,
    /// Hashed user key
    pub user_ref: String,
    pub role: Role,
    pub intent: IntentKind,
    /// Issue signatures only
    pub issues: Vec<String>,
    pub severity: Severity,
    pub css_score: Option<u32>,
    pub route: Route,
}
