use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use crate::models::{DonorId, EventId};
use crate::services::store::{DonorStore, EditStore, StoreError};

/// Uncommitted add/remove intents for one event
///
/// `added` and `removed` are always disjoint: staging a donor in one set
/// takes it out of the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorEdits {
    pub added: BTreeSet<DonorId>,
    pub removed: BTreeSet<DonorId>,
}

impl DonorEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_add(&mut self, donor_id: DonorId) {
        self.removed.remove(&donor_id);
        self.added.insert(donor_id);
    }

    pub fn stage_remove(&mut self, donor_id: DonorId) {
        self.added.remove(&donor_id);
        self.removed.insert(donor_id);
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Final donor list once these edits are applied to `persisted`
    ///
    /// Kept donors retain their persisted order, staged additions follow in
    /// id order. Duplicates are dropped.
    pub fn reconcile(&self, persisted: &[DonorId]) -> Vec<DonorId> {
        let mut seen = BTreeSet::new();
        persisted
            .iter()
            .copied()
            .filter(|id| !self.removed.contains(id))
            .chain(self.added.iter().copied())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Outcome of saving an event's pending edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub donor_ids: Vec<DonorId>,
    pub added: usize,
    pub removed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error("No edits to save for event {0}")]
    NoPendingEdits(EventId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-event pending edit sessions
///
/// Sessions are created on the first stage call and removed on commit or
/// discard. Staging is a single atomic operation in the [`EditStore`], so
/// instances sharing one store never overwrite each other's edits. Commit
/// and discard for one event additionally run under that event's in-process
/// lock; the lock is dropped from the map once no caller holds it.
pub struct EditSessions {
    store: Arc<dyn EditStore>,
    locks: Mutex<HashMap<EventId, Arc<tokio::sync::Mutex<()>>>>,
}

impl EditSessions {
    pub fn new(store: Arc<dyn EditStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, event_id: EventId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(event_id).or_default().clone()
    }

    /// Forget the event's lock when the map holds the last reference
    fn release(&self, event_id: EventId, lock: Arc<tokio::sync::Mutex<()>>) {
        drop(lock);
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks.get(&event_id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(&event_id);
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    /// Current session, if any
    pub async fn get(&self, event_id: EventId) -> Result<Option<DonorEdits>, StoreError> {
        self.store.get(event_id).await
    }

    /// Current session, or an empty one when nothing is staged
    pub async fn snapshot(&self, event_id: EventId) -> Result<DonorEdits, StoreError> {
        Ok(self.store.get(event_id).await?.unwrap_or_default())
    }

    pub async fn stage_add(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, StoreError> {
        self.store.stage_add(event_id, donor_id).await
    }

    pub async fn stage_remove(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, StoreError> {
        self.store.stage_remove(event_id, donor_id).await
    }

    /// Apply the event's session to its committed donor list and clear it
    ///
    /// Only the intents that were applied are cleared, so a stage that lands
    /// mid-commit stays pending. The session is kept when the apply fails.
    pub async fn commit(
        &self,
        event_id: EventId,
        donors: &dyn DonorStore,
    ) -> Result<CommitOutcome, CommitError> {
        let lock = self.lock_for(event_id);
        let result = {
            let _guard = lock.lock().await;
            self.commit_locked(event_id, donors).await
        };
        self.release(event_id, lock);
        result
    }

    async fn commit_locked(
        &self,
        event_id: EventId,
        donors: &dyn DonorStore,
    ) -> Result<CommitOutcome, CommitError> {
        let edits = self
            .store
            .get(event_id)
            .await?
            .ok_or(CommitError::NoPendingEdits(event_id))?;

        let donor_ids = donors.apply_donor_edits(event_id, &edits).await?;
        self.store.retire(event_id, &edits).await?;

        tracing::debug!(
            "Committed {} donors for event {} (+{} / -{})",
            donor_ids.len(),
            event_id,
            edits.added.len(),
            edits.removed.len()
        );

        Ok(CommitOutcome {
            donor_ids,
            added: edits.added.len(),
            removed: edits.removed.len(),
        })
    }

    /// Drop the event's session; absent sessions are fine
    pub async fn discard(&self, event_id: EventId) -> Result<bool, StoreError> {
        let lock = self.lock_for(event_id);
        let result = {
            let _guard = lock.lock().await;
            self.store.delete(event_id).await
        };
        self.release(event_id, lock);
        result
    }
}
