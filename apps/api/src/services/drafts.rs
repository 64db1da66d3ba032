//! Draft persistence — key-value snapshots of in-progress resume state.
//!
//! Snapshots land in Redis under one key per user. Writes are debounced:
//! identical snapshots are skipped outright, and rapid successive edits
//! within the debounce window are deferred so the client batches instead of
//! writing every keystroke.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft store error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One persisted draft snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub saved_at: DateTime<Utc>,
    pub data: Value,
}

/// What happened to a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    /// Written to the store.
    Saved,
    /// Identical to the last written snapshot; nothing to do.
    SkippedUnchanged,
    /// A different snapshot arrived inside the debounce window; the client
    /// should retry after the window elapses.
    Deferred,
}

#[derive(Clone, Copy)]
struct WriteRecord {
    content_hash: u64,
    written_at: Instant,
}

/// Redis-backed draft store with per-user write debouncing.
#[derive(Clone)]
pub struct DraftStore {
    client: redis::Client,
    debounce: Duration,
    recent: Arc<Mutex<HashMap<Uuid, WriteRecord>>>,
}

impl DraftStore {
    pub fn new(client: redis::Client, debounce_ms: u64) -> Self {
        DraftStore {
            client,
            debounce: Duration::from_millis(debounce_ms),
            recent: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Saves a snapshot for the user, subject to the debounce policy.
    pub async fn save(&self, user_id: Uuid, data: &Value) -> Result<SaveOutcome, DraftError> {
        let serialized = serde_json::to_string(data)?;
        let content_hash = hash_str(&serialized);

        let decision = {
            let recent = self
                .recent
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            save_decision(
                recent.get(&user_id).copied(),
                content_hash,
                Instant::now(),
                self.debounce,
            )
        };
        if decision != SaveOutcome::Saved {
            debug!("Draft save for {user_id}: {decision:?}");
            return Ok(decision);
        }

        let snapshot = DraftSnapshot {
            saved_at: Utc::now(),
            data: data.clone(),
        };
        let payload = serde_json::to_string(&snapshot)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(draft_key(user_id), payload).await?;

        let mut recent = self
            .recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        recent.insert(
            user_id,
            WriteRecord {
                content_hash,
                written_at: Instant::now(),
            },
        );
        Ok(SaveOutcome::Saved)
    }

    /// Loads the user's snapshot, if one exists.
    pub async fn load(&self, user_id: Uuid) -> Result<Option<DraftSnapshot>, DraftError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(draft_key(user_id)).await?;
        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

fn draft_key(user_id: Uuid) -> String {
    format!("draft:{user_id}")
}

fn hash_str(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

/// Pure debounce decision: unchanged content is skipped, changed content
/// inside the window is deferred, everything else is written.
fn save_decision(
    previous: Option<WriteRecord>,
    content_hash: u64,
    now: Instant,
    debounce: Duration,
) -> SaveOutcome {
    match previous {
        Some(record) if record.content_hash == content_hash => SaveOutcome::SkippedUnchanged,
        Some(record) if now.duration_since(record.written_at) < debounce => SaveOutcome::Deferred,
        _ => SaveOutcome::Saved,
    }
}
