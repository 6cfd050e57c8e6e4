//! Session state stores
//!
//! `get` returns the stored state (default when absent). `set` upserts:
//! insert-if-absent, else field-merge, stamping `last_updated`. The
//! pipeline only talks to stores through `load_state`/`save_patch`, which
//! swallow failures so an unavailable store degrades to conservative mode.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use crate::error::StoreError;
use crate::types::{SessionPatch, SessionState};

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<SessionState, StoreError>;

    async fn set(&self, user_id: &str, patch: &SessionPatch) -> Result<(), StoreError>;
}

/// Read state; any failure yields the all-false/zero/empty default.
/// Histories longer than their capacity are cut to the newest entries.
pub async fn load_state(store: &dyn SessionStore, user_id: &str) -> SessionState {
    match store.get(user_id).await {
        Ok(mut state) => {
            state.clamp_histories();
            state
        }
        Err(e) => {
            warn!(error = %e, "session read failed, using default state");
            SessionState::default()
        }
    }
}

/// Best-effort write; failures are logged and dropped
pub async fn save_patch(store: &dyn SessionStore, user_id: &str, patch: &SessionPatch) {
    if patch.is_empty() {
        return;
    }
    if let Err(e) = store.set(user_id, patch).await {
        warn!(error = %e, "session write failed, update dropped");
    }
}

fn merge(existing: Option<SessionState>, patch: &SessionPatch) -> SessionState {
    let mut state = existing.unwrap_or_default();
    state.apply(patch);
    state.last_updated = Some(Utc::now());
    state
}

// =============================================================================
// In-process store
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<SessionState, StoreError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set(&self, user_id: &str, patch: &SessionPatch) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let merged = merge(sessions.remove(user_id), patch);
        sessions.insert(user_id.to_string(), merged);
        Ok(())
    }
}

// =============================================================================
// JSON file store
// =============================================================================

/// One JSON document per user under a directory. File names are the
/// SHA-256 of the user id, so any id maps to a safe path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        let digest = Sha256::digest(user_id.as_bytes());
        let name: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        self.dir.join(format!("{}.json", name))
    }

    async fn read(&self, path: &Path) -> Result<Option<SessionState>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SessionStore for JsonFileStore {
    async fn get(&self, user_id: &str) -> Result<SessionState, StoreError> {
        Ok(self.read(&self.path_for(user_id)).await?.unwrap_or_default())
    }

    async fn set(&self, user_id: &str, patch: &SessionPatch) -> Result<(), StoreError> {
        let path = self.path_for(user_id);
        let merged = merge(self.read(&path).await?, patch);
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(&merged)?;
        // Write beside the target, then swap it in
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), "session written");
        Ok(())
    }
}

// =============================================================================
// Always-failing store
// =============================================================================

/// Fails every call
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn get(&self, _user_id: &str) -> Result<SessionState, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn set(&self, _user_id: &str, _patch: &SessionPatch) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

// =============================================================================
// TESTS
// =============================================================================
