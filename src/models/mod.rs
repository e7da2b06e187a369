// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Donor, DonorId, Engagement, Event, EventId, EventStatus, EventSummary, UnknownEngagement};
pub use requests::{DonorEditRequest, DonorSearchQuery, MatchOverrides, SuggestQuery};
pub use responses::{ErrorResponse, HealthResponse, MessageResponse, SuggestResponse};
