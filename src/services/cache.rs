use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::core::edits::DonorEdits;
use crate::models::{DonorId, EventId};
use crate::services::store::{EditStore, StoreError};

/// Redis-backed pending edit store
///
/// Each event's session is a pair of sets, staged additions and staged
/// removals. Every mutation runs as one `MULTI`/`EXEC` block, so instances
/// sharing the Redis server see each other's edits and never overwrite
/// them. Keys never expire, so uncommitted edits survive a restart.
pub struct RedisEditStore {
    // Store ConnectionManager in a Mutex for interior mutability
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
}

impl RedisEditStore {
    pub async fn new(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
        })
    }

    /// Move `donor_id` out of one set and into the other, then read both back
    async fn stage(&self, event_id: EventId, donor_id: DonorId, add: bool) -> Result<DonorEdits, StoreError> {
        let added_key = CacheKey::added_donors(event_id);
        let removed_key = CacheKey::removed_donors(event_id);
        let (into, out_of) = if add {
            (&added_key, &removed_key)
        } else {
            (&removed_key, &added_key)
        };

        let mut conn = self.redis.lock().await;
        let (added, removed): (Vec<DonorId>, Vec<DonorId>) = redis::pipe()
            .atomic()
            .cmd("SREM").arg(out_of).arg(donor_id).ignore()
            .cmd("SADD").arg(into).arg(donor_id).ignore()
            .cmd("SMEMBERS").arg(&added_key)
            .cmd("SMEMBERS").arg(&removed_key)
            .query_async(&mut *conn)
            .await?;

        tracing::trace!("Edit session staged: event {} donor {} add={}", event_id, donor_id, add);
        Ok(edits_from_members(added, removed))
    }
}

fn edits_from_members(added: Vec<DonorId>, removed: Vec<DonorId>) -> DonorEdits {
    DonorEdits {
        added: added.into_iter().collect(),
        removed: removed.into_iter().collect(),
    }
}

#[async_trait]
impl EditStore for RedisEditStore {
    async fn get(&self, event_id: EventId) -> Result<Option<DonorEdits>, StoreError> {
        let mut conn = self.redis.lock().await;
        let (added, removed): (Vec<DonorId>, Vec<DonorId>) = redis::pipe()
            .atomic()
            .cmd("SMEMBERS").arg(CacheKey::added_donors(event_id))
            .cmd("SMEMBERS").arg(CacheKey::removed_donors(event_id))
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        let edits = edits_from_members(added, removed);
        if edits.is_empty() {
            Ok(None)
        } else {
            tracing::trace!("Edit session hit: event {}", event_id);
            Ok(Some(edits))
        }
    }

    async fn stage_add(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, StoreError> {
        self.stage(event_id, donor_id, true).await
    }

    async fn stage_remove(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, StoreError> {
        self.stage(event_id, donor_id, false).await
    }

    async fn retire(&self, event_id: EventId, applied: &DonorEdits) -> Result<(), StoreError> {
        if applied.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        if !applied.added.is_empty() {
            let ids: Vec<DonorId> = applied.added.iter().copied().collect();
            pipe.cmd("SREM").arg(CacheKey::added_donors(event_id)).arg(ids).ignore();
        }
        if !applied.removed.is_empty() {
            let ids: Vec<DonorId> = applied.removed.iter().copied().collect();
            pipe.cmd("SREM").arg(CacheKey::removed_donors(event_id)).arg(ids).ignore();
        }

        let mut conn = self.redis.lock().await;
        pipe.query_async::<()>(&mut *conn).await?;
        Ok(())
    }

    async fn delete(&self, event_id: EventId) -> Result<bool, StoreError> {
        let mut conn = self.redis.lock().await;
        let removed: i64 = redis::cmd("DEL")
            .arg(CacheKey::added_donors(event_id))
            .arg(CacheKey::removed_donors(event_id))
            .query_async(&mut *conn)
            .await?;

        Ok(removed > 0)
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Set of donors staged for addition to an event
    pub fn added_donors(event_id: EventId) -> String {
        format!("donor_edits:{}:added", event_id)
    }

    /// Set of donors staged for removal from an event
    pub fn removed_donors(event_id: EventId) -> String {
        format!("donor_edits:{}:removed", event_id)
    }
}
