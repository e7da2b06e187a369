//! Donor Match - donor recommendation and invitation lists for fundraising events
//!
//! This library provides the cascading-filter donor matcher and the pending
//! edit sessions used to build an event's invitation list before it is saved.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{DonorEdits, DonorMatcher, ExclusionSet, InvitationService, MatchCriteria, MatchResult};
pub use error::InvitationError;
pub use models::{Donor, DonorId, Engagement, Event, EventId, MatchOverrides, SuggestResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let excluded = ExclusionSet::new(&[1, 2], &DonorEdits::default());
        assert!(excluded.contains(1));
        assert_eq!(Engagement::default(), Engagement::High);
    }
}
