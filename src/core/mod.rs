// Core algorithm exports
pub mod edits;
pub mod filters;
pub mod invitations;
pub mod matcher;

pub use edits::{CommitError, CommitOutcome, DonorEdits, EditSessions};
pub use filters::{ExclusionSet, FilterPass, MatchCriteria};
pub use invitations::InvitationService;
pub use matcher::{DonorMatcher, MatchResult};
