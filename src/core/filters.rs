use std::collections::HashSet;

use crate::core::edits::DonorEdits;
use crate::models::{Donor, DonorId, Engagement};

/// Target attributes a donor is matched against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    pub city: String,
    pub medical_focus: String,
    pub engagement: Engagement,
}

#[inline]
pub fn matches_city(donor: &Donor, criteria: &MatchCriteria) -> bool {
    donor.city == criteria.city
}

#[inline]
pub fn matches_focus(donor: &Donor, criteria: &MatchCriteria) -> bool {
    donor.has_focus(&criteria.medical_focus)
}

#[inline]
pub fn matches_engagement(donor: &Donor, criteria: &MatchCriteria) -> bool {
    donor.engagement == criteria.engagement
}

/// One pass of the specificity cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPass {
    CityFocusEngagement,
    CityEngagement,
    CityFocus,
    FocusEngagement,
    City,
    Engagement,
    Focus,
}

impl FilterPass {
    /// Passes in precedence order, most specific first
    pub const CASCADE: [FilterPass; 7] = [
        FilterPass::CityFocusEngagement,
        FilterPass::CityEngagement,
        FilterPass::CityFocus,
        FilterPass::FocusEngagement,
        FilterPass::City,
        FilterPass::Engagement,
        FilterPass::Focus,
    ];

    #[inline]
    pub fn matches(self, donor: &Donor, criteria: &MatchCriteria) -> bool {
        let city = || matches_city(donor, criteria);
        let focus = || matches_focus(donor, criteria);
        let engagement = || matches_engagement(donor, criteria);

        match self {
            FilterPass::CityFocusEngagement => city() && focus() && engagement(),
            FilterPass::CityEngagement => city() && engagement(),
            FilterPass::CityFocus => city() && focus(),
            FilterPass::FocusEngagement => focus() && engagement(),
            FilterPass::City => city(),
            FilterPass::Engagement => engagement(),
            FilterPass::Focus => focus(),
        }
    }
}

/// Donors that must not be offered for an event
///
/// Committed donors are excluded unless a removal is staged for them;
/// staged additions are always excluded.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    ids: HashSet<DonorId>,
}

impl ExclusionSet {
    pub fn new(assigned: &[DonorId], edits: &DonorEdits) -> Self {
        let ids = assigned
            .iter()
            .copied()
            .filter(|id| !edits.removed.contains(id))
            .chain(edits.added.iter().copied())
            .collect();

        Self { ids }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, donor_id: DonorId) -> bool {
        self.ids.contains(&donor_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
