use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

use crate::core::edits::{CommitOutcome, DonorEdits, EditSessions};
use crate::core::filters::{ExclusionSet, MatchCriteria};
use crate::core::matcher::{DonorMatcher, MatchResult};
use crate::error::InvitationError;
use crate::models::{Donor, DonorId, Engagement, Event, EventId, EventSummary, MatchOverrides};
use crate::services::store::{DonorStore, EditStore, EventStore};

/// Builds and edits per-event donor invitation lists
///
/// Owns the matcher, the pending edit sessions and the random source used
/// for backfill. Store access goes through the injected trait objects.
pub struct InvitationService {
    donors: Arc<dyn DonorStore>,
    events: Arc<dyn EventStore>,
    sessions: EditSessions,
    matcher: DonorMatcher,
    default_engagement: Engagement,
    rng: Mutex<StdRng>,
}

impl InvitationService {
    pub fn new(
        donors: Arc<dyn DonorStore>,
        events: Arc<dyn EventStore>,
        edits: Arc<dyn EditStore>,
    ) -> Self {
        Self {
            donors,
            events,
            sessions: EditSessions::new(edits),
            matcher: DonorMatcher::new(),
            default_engagement: Engagement::default(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Use a fixed seed for backfill
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_default_engagement(mut self, engagement: Engagement) -> Self {
        self.default_engagement = engagement;
        self
    }

    async fn require_event(&self, event_id: EventId) -> Result<Event, InvitationError> {
        self.events
            .get_event(event_id)
            .await?
            .ok_or(InvitationError::EventNotFound(event_id))
    }

    async fn exclusions(&self, event_id: EventId) -> Result<ExclusionSet, InvitationError> {
        let assigned = self.donors.list_assigned_donor_ids(event_id).await?;
        let edits = self.sessions.snapshot(event_id).await?;
        Ok(ExclusionSet::new(&assigned, &edits))
    }

    fn criteria_for(&self, event: &Event, overrides: &MatchOverrides) -> MatchCriteria {
        MatchCriteria {
            city: overrides.city.clone().unwrap_or_else(|| event.city.clone()),
            medical_focus: overrides
                .medical_focus
                .clone()
                .unwrap_or_else(|| event.medical_focus.clone()),
            engagement: overrides.engagement.unwrap_or(self.default_engagement),
        }
    }

    /// Recommend donors for an event
    ///
    /// Committed donors are left out unless a removal is staged for them,
    /// and staged additions are always left out.
    pub async fn suggest(
        &self,
        event_id: EventId,
        overrides: &MatchOverrides,
    ) -> Result<MatchResult, InvitationError> {
        let event = self.require_event(event_id).await?;
        let pool = self.donors.list_donors().await?;
        let excluded = self.exclusions(event_id).await?;
        let criteria = self.criteria_for(&event, overrides);

        let result = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.matcher
                .suggest(&criteria, &pool, &excluded, event.capacity, &mut *rng)
        };

        tracing::debug!(
            "Suggested {} + {} donors for event {} ({} eligible, {} excluded, {} backfilled)",
            result.best.len(),
            result.additional.len(),
            event_id,
            result.eligible,
            excluded.len(),
            result.backfilled
        );

        Ok(result)
    }

    /// Donors matching a name fragment that could still be added to the event
    pub async fn search(&self, event_id: EventId, name: &str) -> Result<Vec<Donor>, InvitationError> {
        self.require_event(event_id).await?;
        let excluded = self.exclusions(event_id).await?;

        let donors = self
            .donors
            .search_donors_by_name(name)
            .await?
            .into_iter()
            .filter(|donor| !excluded.contains(donor.id))
            .collect();

        Ok(donors)
    }

    async fn require_donor(&self, donor_id: DonorId) -> Result<(), InvitationError> {
        if self.donors.donor_exists(donor_id).await? {
            Ok(())
        } else {
            Err(InvitationError::DonorNotFound(donor_id))
        }
    }

    pub async fn stage_add(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, InvitationError> {
        self.require_event(event_id).await?;
        self.require_donor(donor_id).await?;
        Ok(self.sessions.stage_add(event_id, donor_id).await?)
    }

    pub async fn stage_remove(&self, event_id: EventId, donor_id: DonorId) -> Result<DonorEdits, InvitationError> {
        self.require_event(event_id).await?;
        self.require_donor(donor_id).await?;
        Ok(self.sessions.stage_remove(event_id, donor_id).await?)
    }

    /// Save the staged edits as the event's donor list
    pub async fn commit(&self, event_id: EventId) -> Result<CommitOutcome, InvitationError> {
        Ok(self.sessions.commit(event_id, self.donors.as_ref()).await?)
    }

    /// Drop the staged edits; returns whether anything was staged
    pub async fn discard(&self, event_id: EventId) -> Result<bool, InvitationError> {
        Ok(self.sessions.discard(event_id).await?)
    }

    pub async fn pending(&self, event_id: EventId) -> Result<DonorEdits, InvitationError> {
        Ok(self.sessions.snapshot(event_id).await?)
    }

    pub async fn event(&self, event_id: EventId) -> Result<Event, InvitationError> {
        self.require_event(event_id).await
    }

    pub async fn events(&self) -> Result<Vec<EventSummary>, InvitationError> {
        Ok(self.events.list_events().await?)
    }

    pub async fn assigned_donors(&self, event_id: EventId) -> Result<Vec<Donor>, InvitationError> {
        self.require_event(event_id).await?;
        Ok(self.donors.list_assigned_donors(event_id).await?)
    }

    pub async fn health_check(&self) -> bool {
        self.donors.health_check().await.unwrap_or(false)
    }
}
