//! In-process store backends.
//!
//! [`MemoryEditStore`] is the default pending-edit backend for a single
//! instance. Its contents are lost on restart. [`MemoryDirectory`] holds
//! donors, events and assignments in memory for tests and benchmarks.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::edits::DonorEdits;
use crate::models::{Donor, DonorId, Event, EventId, EventStatus, EventSummary};
use crate::services::store::{DonorStore, EditStore, EventStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryEditStore {
    sessions: RwLock<HashMap<EventId, DonorEdits>>,
}

impl MemoryEditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EditStore for MemoryEditStore {
    async fn get(&self, event_id: EventId) -> Result<Option<DonorEdits>, StoreError> {
        Ok(self.sessions.read().await.get(&event_id).cloned())
    }

    async fn stage_add(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, StoreError> {
        let mut sessions = self.sessions.write().await;
        let edits = sessions.entry(event_id).or_default();
        edits.stage_add(donor_id);
        Ok(edits.clone())
    }

    async fn stage_remove(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, StoreError> {
        let mut sessions = self.sessions.write().await;
        let edits = sessions.entry(event_id).or_default();
        edits.stage_remove(donor_id);
        Ok(edits.clone())
    }

    async fn retire(&self, event_id: EventId, applied: &DonorEdits) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if let Some(edits) = sessions.get_mut(&event_id) {
            edits.added.retain(|id| !applied.added.contains(id));
            edits.removed.retain(|id| !applied.removed.contains(id));
            if edits.is_empty() {
                sessions.remove(&event_id);
            }
        }
        Ok(())
    }

    async fn delete(&self, event_id: EventId) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(&event_id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct MemoryDirectory {
    donors: RwLock<Vec<Donor>>,
    events: RwLock<HashMap<EventId, Event>>,
    assignments: RwLock<HashMap<EventId, Vec<DonorId>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a donor, keeping the pool ordered by id
    pub async fn insert_donor(&self, donor: Donor) {
        let mut donors = self.donors.write().await;
        match donors.binary_search_by_key(&donor.id, |d| d.id) {
            Ok(index) => donors[index] = donor,
            Err(index) => donors.insert(index, donor),
        }
    }

    pub async fn insert_event(&self, event: Event) {
        self.events.write().await.insert(event.id, event);
    }

    /// Overwrite the committed donor list of an event
    pub async fn assign(&self, event_id: EventId, donor_ids: Vec<DonorId>) {
        self.assignments.write().await.insert(event_id, donor_ids);
    }
}

#[async_trait]
impl DonorStore for MemoryDirectory {
    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError> {
        Ok(self.donors.read().await.clone())
    }

    async fn list_assigned_donor_ids(&self, event_id: EventId) -> Result<Vec<DonorId>, StoreError> {
        Ok(self
            .assignments
            .read()
            .await
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_assigned_donors(&self, event_id: EventId) -> Result<Vec<Donor>, StoreError> {
        let assigned = self.list_assigned_donor_ids(event_id).await?;
        let donors = self.donors.read().await;
        Ok(donors
            .iter()
            .filter(|d| assigned.contains(&d.id))
            .cloned()
            .collect())
    }

    async fn apply_donor_edits(
        &self,
        event_id: EventId,
        edits: &DonorEdits,
    ) -> Result<Vec<DonorId>, StoreError> {
        let mut assignments = self.assignments.write().await;
        let persisted = assignments.get(&event_id).cloned().unwrap_or_default();
        let donor_ids = edits.reconcile(&persisted);
        assignments.insert(event_id, donor_ids.clone());
        Ok(donor_ids)
    }

    /// Matches first or last name separately, the way the SQL store does
    async fn search_donors_by_name(&self, pattern: &str) -> Result<Vec<Donor>, StoreError> {
        let needle = pattern.to_lowercase();
        Ok(self
            .donors
            .read()
            .await
            .iter()
            .filter(|d| {
                let name = d.name.to_lowercase();
                let (first, last) = name.split_once(' ').unwrap_or((name.as_str(), ""));
                first.contains(&needle) || last.contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn donor_exists(&self, donor_id: DonorId) -> Result<bool, StoreError> {
        Ok(self.donors.read().await.iter().any(|d| d.id == donor_id))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl EventStore for MemoryDirectory {
    async fn get_event(&self, event_id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.events.read().await.get(&event_id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<EventSummary>, StoreError> {
        let events = self.events.read().await;
        let assignments = self.assignments.read().await;

        let mut summaries: Vec<EventSummary> = events
            .values()
            .map(|e| {
                let donor_count = assignments.get(&e.id).map_or(0, |ids| ids.len() as i64);
                EventSummary {
                    id: e.id,
                    name: e.name.clone(),
                    date: e.date,
                    city: e.city.clone(),
                    medical_focus: e.medical_focus.clone(),
                    capacity: e.capacity,
                    coordinator: e.coordinator.clone(),
                    fundraiser: e.fundraiser.clone(),
                    donor_count,
                    status: EventStatus::from_counts(donor_count, e.capacity),
                }
            })
            .collect();
        summaries.sort_by_key(|s| s.id);

        Ok(summaries)
    }
}

/// Event fixture with placeholder descriptive fields
pub fn sample_event(id: EventId, city: &str, medical_focus: &str, capacity: i32) -> Event {
    Event {
        id,
        name: format!("Gala {}", id),
        date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
        location: "Main Hall".to_string(),
        city: city.to_string(),
        medical_focus: medical_focus.to_string(),
        capacity,
        coordinator: "Sam Lee".to_string(),
        fundraiser: "Riley Chen".to_string(),
        details: None,
    }
}
