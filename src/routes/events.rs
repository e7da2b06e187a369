use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::InvitationService;
use crate::error::InvitationError;
use crate::models::{
    DonorEditRequest, DonorSearchQuery, ErrorResponse, EventId, HealthResponse, MessageResponse,
    SuggestQuery, SuggestResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub invitations: Arc<InvitationService>,
}

/// Configure all event and donor-list routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/events", web::get().to(list_events))
        .route("/events/{event_id}", web::get().to(get_event))
        .route("/events/{event_id}/donors", web::get().to(list_event_donors))
        .route("/events/{event_id}/suggest-donors", web::get().to(suggest_donors))
        .route("/events/{event_id}/donors/add", web::post().to(add_donor))
        .route("/events/{event_id}/donors/remove", web::post().to(remove_donor))
        .route("/events/{event_id}/donors/save", web::post().to(save_donor_list))
        .route("/events/{event_id}/donors/cancel", web::post().to(cancel_donor_edits))
        .route("/events/{event_id}/donors/search", web::get().to(search_donors));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.invitations.health_check().await;

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// GET /api/v1/events
async fn list_events(state: web::Data<AppState>) -> Result<HttpResponse, InvitationError> {
    let events = state.invitations.events().await?;
    Ok(HttpResponse::Ok().json(events))
}

/// GET /api/v1/events/{event_id}
async fn get_event(
    state: web::Data<AppState>,
    path: web::Path<EventId>,
) -> Result<HttpResponse, InvitationError> {
    let event = state.invitations.event(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(event))
}

/// Committed donor list of an event
///
/// GET /api/v1/events/{event_id}/donors
async fn list_event_donors(
    state: web::Data<AppState>,
    path: web::Path<EventId>,
) -> Result<HttpResponse, InvitationError> {
    let donors = state.invitations.assigned_donors(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(donors))
}

/// Suggest donors endpoint
///
/// GET /api/v1/events/{event_id}/suggest-donors?city=&medical_focus=&engagement=
///
/// Unset or empty parameters fall back to the event's city and medical
/// focus and to the configured default engagement.
async fn suggest_donors(
    state: web::Data<AppState>,
    path: web::Path<EventId>,
    query: web::Query<SuggestQuery>,
) -> Result<HttpResponse, InvitationError> {
    let event_id = path.into_inner();

    let overrides = match query.overrides() {
        Ok(overrides) => overrides,
        Err(e) => {
            tracing::info!("Rejected suggest-donors query for event {}: {}", event_id, e);
            return Ok(bad_request("invalid_engagement", e.to_string()));
        }
    };

    let result = state.invitations.suggest(event_id, &overrides).await?;

    tracing::info!(
        "Returning {} best and {} additional donors for event {}",
        result.best.len(),
        result.additional.len(),
        event_id
    );

    Ok(HttpResponse::Ok().json(SuggestResponse {
        best: result.best,
        additional: result.additional,
    }))
}

/// Stage a donor for inclusion
///
/// POST /api/v1/events/{event_id}/donors/add
///
/// Request body:
/// ```json
/// { "donorId": 42 }
/// ```
async fn add_donor(
    state: web::Data<AppState>,
    path: web::Path<EventId>,
    req: web::Json<DonorEditRequest>,
) -> Result<HttpResponse, InvitationError> {
    if let Err(errors) = req.validate() {
        return Ok(bad_request("Validation failed", errors.to_string()));
    }

    let event_id = path.into_inner();
    state.invitations.stage_add(event_id, req.donor_id).await?;
    tracing::debug!("Staged donor {} for event {}", req.donor_id, event_id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Donor temporarily added")))
}

/// Stage a donor for removal
///
/// POST /api/v1/events/{event_id}/donors/remove
async fn remove_donor(
    state: web::Data<AppState>,
    path: web::Path<EventId>,
    req: web::Json<DonorEditRequest>,
) -> Result<HttpResponse, InvitationError> {
    if let Err(errors) = req.validate() {
        return Ok(bad_request("Validation failed", errors.to_string()));
    }

    let event_id = path.into_inner();
    state.invitations.stage_remove(event_id, req.donor_id).await?;
    tracing::debug!("Staged removal of donor {} from event {}", req.donor_id, event_id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Donor temporarily removed")))
}

/// POST /api/v1/events/{event_id}/donors/save
async fn save_donor_list(
    state: web::Data<AppState>,
    path: web::Path<EventId>,
) -> Result<HttpResponse, InvitationError> {
    let event_id = path.into_inner();
    let outcome = state.invitations.commit(event_id).await?;

    tracing::info!(
        "Saved donor list for event {}: {} donors (+{} / -{})",
        event_id,
        outcome.donor_ids.len(),
        outcome.added,
        outcome.removed
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("Donor list saved")))
}

/// POST /api/v1/events/{event_id}/donors/cancel
async fn cancel_donor_edits(
    state: web::Data<AppState>,
    path: web::Path<EventId>,
) -> Result<HttpResponse, InvitationError> {
    let event_id = path.into_inner();
    if state.invitations.discard(event_id).await? {
        tracing::debug!("Discarded pending edits for event {}", event_id);
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new("Donor edits canceled")))
}

/// Search donors by name, leaving out those already on the list
///
/// GET /api/v1/events/{event_id}/donors/search?name=
async fn search_donors(
    state: web::Data<AppState>,
    path: web::Path<EventId>,
    query: web::Query<DonorSearchQuery>,
) -> Result<HttpResponse, InvitationError> {
    if let Err(errors) = query.validate() {
        return Ok(bad_request("Validation failed", errors.to_string()));
    }

    let donors = state.invitations.search(path.into_inner(), query.name.trim()).await?;
    Ok(HttpResponse::Ok().json(donors))
}
