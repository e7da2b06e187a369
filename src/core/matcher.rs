use rand::Rng;

use crate::core::filters::{ExclusionSet, FilterPass, MatchCriteria};
use crate::models::Donor;

/// Result of the matching process
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub best: Vec<Donor>,
    pub additional: Vec<Donor>,
    /// Candidates drawn at random after the cascade ran dry
    pub backfilled: usize,
    /// Donors that were not excluded before matching began
    pub eligible: usize,
}

impl MatchResult {
    pub fn len(&self) -> usize {
        self.best.len() + self.additional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty() && self.additional.is_empty()
    }
}

/// Donor recommendation engine
///
/// # Pipeline Stages
/// 1. Drop excluded donors
/// 2. Cascade of attribute filters, most specific first
/// 3. Uniform random backfill without replacement
/// 4. Split into best and additional partitions of `capacity` each
#[derive(Debug, Clone)]
pub struct DonorMatcher {
    cascade: Vec<FilterPass>,
}

impl DonorMatcher {
    pub fn new() -> Self {
        Self {
            cascade: FilterPass::CASCADE.to_vec(),
        }
    }

    /// Produce up to `2 × capacity` candidates for an event
    ///
    /// Each pass scans the donors not yet chosen in pool order and appends
    /// matches until the target is reached. A donor chosen by an earlier
    /// pass is never reconsidered. A non-positive capacity yields an empty
    /// result.
    pub fn suggest<R>(
        &self,
        criteria: &MatchCriteria,
        pool: &[Donor],
        excluded: &ExclusionSet,
        capacity: i32,
        rng: &mut R,
    ) -> MatchResult
    where
        R: Rng,
    {
        let capacity = usize::try_from(capacity).unwrap_or(0);
        let target = capacity.saturating_mul(2);

        let mut remaining: Vec<&Donor> = pool
            .iter()
            .filter(|donor| !excluded.contains(donor.id))
            .collect();
        let eligible = remaining.len();

        let mut picked: Vec<&Donor> = Vec::with_capacity(target.min(eligible));

        for pass in &self.cascade {
            if picked.len() >= target {
                break;
            }

            let mut rest = Vec::with_capacity(remaining.len());
            for donor in remaining {
                if picked.len() < target && pass.matches(donor, criteria) {
                    picked.push(donor);
                } else {
                    rest.push(donor);
                }
            }
            remaining = rest;
        }

        let matched = picked.len();
        while picked.len() < target && !remaining.is_empty() {
            let index = rng.random_range(0..remaining.len());
            picked.push(remaining.swap_remove(index));
        }
        let backfilled = picked.len() - matched;

        let mut candidates = picked.into_iter().cloned();
        let best: Vec<Donor> = candidates.by_ref().take(capacity).collect();
        let additional: Vec<Donor> = candidates.collect();

        MatchResult {
            best,
            additional,
            backfilled,
            eligible,
        }
    }
}

impl Default for DonorMatcher {
    fn default() -> Self {
        Self::new()
    }
}
