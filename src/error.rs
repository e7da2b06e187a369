//! Errors surfaced by the invitation core and their HTTP mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::core::edits::CommitError;
use crate::models::{DonorId, ErrorResponse, EventId};
use crate::services::store::StoreError;

#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("Event {0} not found")]
    EventNotFound(EventId),

    #[error("Donor {0} not found")]
    DonorNotFound(DonorId),

    /// Save requested while no edits are staged for the event
    #[error("No edits to save for event {0}")]
    NoPendingEdits(EventId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CommitError> for InvitationError {
    fn from(value: CommitError) -> Self {
        match value {
            CommitError::NoPendingEdits(event_id) => InvitationError::NoPendingEdits(event_id),
            CommitError::Store(e) => InvitationError::Store(e),
        }
    }
}

impl InvitationError {
    fn kind(&self) -> &'static str {
        match self {
            InvitationError::EventNotFound(_) => "event_not_found",
            InvitationError::DonorNotFound(_) => "donor_not_found",
            InvitationError::NoPendingEdits(_) => "no_pending_edits",
            InvitationError::Store(_) => "store_failure",
        }
    }
}

impl ResponseError for InvitationError {
    fn status_code(&self) -> StatusCode {
        match self {
            InvitationError::EventNotFound(_) | InvitationError::DonorNotFound(_) => StatusCode::NOT_FOUND,
            InvitationError::NoPendingEdits(_) => StatusCode::BAD_REQUEST,
            InvitationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
