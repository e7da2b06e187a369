//! Storage seams consumed by the invitation core.
//!
//! Donors and events live in the relational store; pending donor edits live
//! in whichever [`EditStore`] the service is built with.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::edits::DonorEdits;
use crate::models::{Donor, DonorId, Event, EventId, EventSummary};

/// Errors raised by any store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Read access to donors plus the committed event-donor associations
#[async_trait]
pub trait DonorStore: Send + Sync {
    /// Every donor with resolved medical focus tags, ordered by id
    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError>;

    /// Ids of donors committed to the event
    async fn list_assigned_donor_ids(&self, event_id: EventId) -> Result<Vec<DonorId>, StoreError>;

    /// Full records of donors committed to the event
    async fn list_assigned_donors(&self, event_id: EventId) -> Result<Vec<Donor>, StoreError>;

    /// Apply pending edits to the event's committed donors as one unit
    ///
    /// Reads the committed list and writes the reconciled one atomically, so
    /// concurrent applies for the same event are serialized. Returns the
    /// final donor ids.
    async fn apply_donor_edits(
        &self,
        event_id: EventId,
        edits: &DonorEdits,
    ) -> Result<Vec<DonorId>, StoreError>;

    /// Donors whose first or last name contains `pattern`, case-insensitively
    async fn search_donors_by_name(&self, pattern: &str) -> Result<Vec<Donor>, StoreError>;

    async fn donor_exists(&self, donor_id: DonorId) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get_event(&self, event_id: EventId) -> Result<Option<Event>, StoreError>;

    /// All events with their committed donor counts
    async fn list_events(&self) -> Result<Vec<EventSummary>, StoreError>;
}

/// Keyed storage for pending donor edits
///
/// Every mutation is atomic in the backend itself, so instances sharing a
/// store cannot lose each other's updates. A session with no intents left
/// does not exist.
#[async_trait]
pub trait EditStore: Send + Sync {
    async fn get(&self, event_id: EventId) -> Result<Option<DonorEdits>, StoreError>;

    /// Stage an addition and return the resulting session
    async fn stage_add(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, StoreError>;

    /// Stage a removal and return the resulting session
    async fn stage_remove(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, StoreError>;

    /// Clear the intents in `applied`, leaving anything staged since
    async fn retire(&self, event_id: EventId, applied: &DonorEdits) -> Result<(), StoreError>;

    /// Returns whether an entry was present
    async fn delete(&self, event_id: EventId) -> Result<bool, StoreError>;
}
