//! Help request route handlers.
//!
//! Covers the full lifecycle surface: submission, listing, viewing,
//! generic updates, deletion and the dedicated status-transition
//! endpoint. Every capability decision goes through the domain
//! authorization gate; every status movement goes through the domain
//! state machine and the repository's compare-and-swap.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use persistence::entities::HelpRequestEntity;
use persistence::repositories::{HelpRequestChanges, HelpRequestRepository, NewHelpRequest};
use shared::sanitize::{sanitize_optional_text, sanitize_text, sanitize_text_bounded};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OptionalUserAuth;
use crate::middleware::metrics::{record_help_request_created, record_status_transition};
use crate::routes::resolve_principal;

use domain::models::help_request::{
    CreateHelpRequestRequest, DeleteHelpRequestRequest, EventSummary, HelpRequestResponse,
    HelpRequestStatus, ListHelpRequestsQuery, ListHelpRequestsResponse, Pagination,
    UpdateHelpRequestRequest, UpdateHelpRequestStatusRequest,
};
use domain::models::user::UserRole;
use domain::services::authorization::{self, Operation, Principal, RequestState};
use domain::services::{fanout, lifecycle};

/// Create help request routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_help_request).get(list_help_requests))
        .route(
            "/:id",
            get(get_help_request)
                .put(update_help_request)
                .delete(delete_help_request),
        )
        .route("/:id/status", post(update_help_request_status))
}

fn to_response(entity: HelpRequestEntity) -> HelpRequestResponse {
    HelpRequestResponse {
        id: entity.id,
        full_name: entity.full_name,
        email: entity.email,
        phone: entity.phone,
        address: entity.address,
        suburb: entity.suburb,
        state: entity.state,
        postcode: entity.postcode,
        help_type: entity.help_type.into(),
        urgency: entity.urgency.into(),
        description: entity.description,
        preferred_date: entity.preferred_date,
        preferred_time: entity.preferred_time,
        status: entity.status.into(),
        volunteer_id: entity.volunteer_id,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

fn to_event_summary(entity: HelpRequestEntity) -> EventSummary {
    EventSummary {
        id: entity.id,
        help_type: entity.help_type.into(),
        urgency: entity.urgency.into(),
        status: entity.status.into(),
        suburb: entity.suburb,
        state: entity.state,
        description: entity.description,
        preferred_date: entity.preferred_date,
        created_at: entity.created_at,
    }
}

fn request_state(entity: &HelpRequestEntity) -> RequestState<'_> {
    RequestState {
        owner_email: &entity.email,
        created_by: entity.created_by,
        status: entity.status.into(),
    }
}

/// The identical not-found shape for missing and unauthorized reads,
/// so record existence never leaks to guessed ids.
fn not_found() -> ApiError {
    ApiError::NotFound("Help request not found".to_string())
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<HelpRequestStatus>, ApiError> {
    status
        .map(|s| {
            s.parse::<HelpRequestStatus>()
                .map_err(ApiError::validation)
        })
        .transpose()
}

fn clamp_pagination(query: &ListHelpRequestsQuery, max_per_page: i64) -> (i64, i64, i64) {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, max_per_page);
    let offset = (page - 1) * per_page;
    (page, per_page, offset)
}

/// Submit a new help request.
///
/// POST /api/v1/help-requests
#[axum::debug_handler]
async fn create_help_request(
    State(state): State<AppState>,
    OptionalUserAuth(auth): OptionalUserAuth,
    Json(request): Json<CreateHelpRequestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = HelpRequestRepository::new(state.pool.clone());

    let entity = repo
        .create(NewHelpRequest {
            full_name: sanitize_text(&request.full_name),
            email: request.email.trim().to_lowercase(),
            phone: request.phone.trim().to_string(),
            address: sanitize_text(&request.address),
            suburb: sanitize_text(&request.suburb),
            state: sanitize_text(&request.state),
            postcode: request.postcode.trim().to_string(),
            help_type: request.help_type,
            urgency: request.urgency,
            description: sanitize_text_bounded(
                &request.description,
                state.config.limits.max_description_length,
            ),
            preferred_date: request.preferred_date,
            preferred_time: sanitize_optional_text(request.preferred_time.as_deref()),
            created_by: auth.as_ref().map(|a| a.user_id),
        })
        .await?;

    record_help_request_created();

    info!(
        request_id = %entity.id,
        help_type = %request.help_type,
        urgency = %request.urgency,
        authenticated = auth.is_some(),
        "Help request created"
    );

    Ok((StatusCode::CREATED, Json(to_response(entity))))
}

/// List help requests visible to the caller.
///
/// GET /api/v1/help-requests
///
/// `?view=events` returns the reduced public projection of approved
/// requests, which carries no contact fields and needs no auth.
#[axum::debug_handler]
async fn list_help_requests(
    State(state): State<AppState>,
    OptionalUserAuth(auth): OptionalUserAuth,
    Query(query): Query<ListHelpRequestsQuery>,
) -> Result<axum::response::Response, ApiError> {
    let repo = HelpRequestRepository::new(state.pool.clone());
    let status = parse_status_filter(query.status.as_deref())?;
    let (page, per_page, offset) = clamp_pagination(&query, state.config.limits.max_per_page);

    if query.view.as_deref() == Some("events") {
        // Public opportunity board: approved requests only, whatever the
        // status filter says
        let status = Some(HelpRequestStatus::Approved);
        let total = repo.count_all(status).await?;
        let entities = repo.list_all(status, per_page, offset).await?;

        let response = ListHelpRequestsResponse {
            data: entities.into_iter().map(to_event_summary).collect(),
            pagination: Pagination {
                page,
                per_page,
                total,
            },
        };
        return Ok((StatusCode::OK, Json(response)).into_response());
    }

    let principal = resolve_principal(&state, auth.as_ref(), None).await?;

    let (total, entities) = match &principal {
        Principal::User { id, email, .. } => {
            if principal.is_admin() {
                (
                    repo.count_all(status).await?,
                    repo.list_all(status, per_page, offset).await?,
                )
            } else {
                (
                    repo.count_for_owner(email, Some(*id), status).await?,
                    repo.list_for_owner(email, Some(*id), status, per_page, offset)
                        .await?,
                )
            }
        }
        Principal::Anonymous { .. } => {
            return Err(ApiError::Unauthorized(
                "Authentication required to list help requests".to_string(),
            ));
        }
    };

    let response = ListHelpRequestsResponse {
        data: entities
            .into_iter()
            .map(to_response)
            .collect::<Vec<HelpRequestResponse>>(),
        pagination: Pagination {
            page,
            per_page,
            total,
        },
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Query parameters for viewing a single request anonymously.
#[derive(Debug, Deserialize)]
struct ViewQuery {
    /// Owner email, proving ownership for anonymous callers.
    #[serde(default)]
    email: Option<String>,
}

/// View a single help request.
///
/// GET /api/v1/help-requests/{id}
#[axum::debug_handler]
async fn get_help_request(
    State(state): State<AppState>,
    OptionalUserAuth(auth): OptionalUserAuth,
    Path(id): Path<Uuid>,
    Query(query): Query<ViewQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = HelpRequestRepository::new(state.pool.clone());

    let entity = repo.find_by_id(id).await?.ok_or_else(not_found)?;
    let principal = resolve_principal(&state, auth.as_ref(), query.email.as_deref()).await?;

    // Unauthorized reads get the same shape as missing records
    authorization::authorize(&principal, &request_state(&entity), Operation::View)
        .map_err(|_| not_found())?;

    Ok((StatusCode::OK, Json(to_response(entity))))
}

/// Update a help request's descriptive fields.
///
/// PUT /api/v1/help-requests/{id}
///
/// The status field deliberately does not exist on the update shape;
/// status changes only move through the transition endpoint.
#[axum::debug_handler]
async fn update_help_request(
    State(state): State<AppState>,
    OptionalUserAuth(auth): OptionalUserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateHelpRequestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = HelpRequestRepository::new(state.pool.clone());

    let entity = repo.find_by_id(id).await?.ok_or_else(not_found)?;
    let principal =
        resolve_principal(&state, auth.as_ref(), request.confirm_email.as_deref()).await?;

    authorization::authorize(&principal, &request_state(&entity), Operation::Edit)?;

    // Confirmation email is a second factor for everyone but admins
    if !principal.is_admin()
        && !authorization::confirmation_matches(&entity.email, request.confirm_email.as_deref())
    {
        return Err(ApiError::Forbidden(
            "Confirmation email does not match".to_string(),
        ));
    }

    let updated = repo
        .update_fields(
            id,
            HelpRequestChanges {
                full_name: request.full_name.as_deref().map(sanitize_text),
                phone: request.phone.map(|p| p.trim().to_string()),
                address: request.address.as_deref().map(sanitize_text),
                suburb: request.suburb.as_deref().map(sanitize_text),
                state: request.state.as_deref().map(sanitize_text),
                postcode: request.postcode.map(|p| p.trim().to_string()),
                help_type: request.help_type,
                urgency: request.urgency,
                description: request.description.as_deref().map(|d| {
                    sanitize_text_bounded(d, state.config.limits.max_description_length)
                }),
                preferred_date: request.preferred_date,
                preferred_time: sanitize_optional_text(request.preferred_time.as_deref()),
            },
        )
        .await?
        .ok_or_else(not_found)?;

    info!(request_id = %id, "Help request updated");

    Ok((StatusCode::OK, Json(to_response(updated))))
}

/// Delete a help request.
///
/// DELETE /api/v1/help-requests/{id}
#[axum::debug_handler]
async fn delete_help_request(
    State(state): State<AppState>,
    OptionalUserAuth(auth): OptionalUserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<DeleteHelpRequestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = HelpRequestRepository::new(state.pool.clone());

    let entity = repo.find_by_id(id).await?.ok_or_else(not_found)?;
    let principal =
        resolve_principal(&state, auth.as_ref(), request.confirm_email.as_deref()).await?;

    authorization::authorize(&principal, &request_state(&entity), Operation::Delete)?;

    if !principal.is_admin()
        && !authorization::confirmation_matches(&entity.email, request.confirm_email.as_deref())
    {
        return Err(ApiError::Forbidden(
            "Confirmation email does not match".to_string(),
        ));
    }

    repo.delete(id).await?;

    info!(request_id = %id, "Help request deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Transition a help request's status.
///
/// POST /api/v1/help-requests/{id}/status
///
/// The only path that mutates status. The repository performs the write
/// as a compare-and-swap against the status this handler read, so two
/// racing transitions cannot both apply; the loser maps to Conflict.
#[axum::debug_handler]
async fn update_help_request_status(
    State(state): State<AppState>,
    OptionalUserAuth(auth): OptionalUserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateHelpRequestStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = HelpRequestRepository::new(state.pool.clone());

    let entity = repo.find_by_id(id).await?.ok_or_else(not_found)?;
    let principal =
        resolve_principal(&state, auth.as_ref(), request.confirm_email.as_deref()).await?;

    let from: HelpRequestStatus = entity.status.into();
    let to = request.status;

    authorization::authorize(
        &principal,
        &request_state(&entity),
        Operation::Transition(to),
    )?;

    let effects = lifecycle::check_transition(from, to, principal.is_admin())?;

    // A claiming volunteer is always assigned themselves; an admin
    // matching on someone's behalf names the volunteer in the body, or
    // leaves the assignment empty.
    let volunteer_id = if effects.assign_volunteer {
        match &principal {
            Principal::User {
                id,
                role: UserRole::Volunteer,
                ..
            } => Some(*id),
            _ => request.volunteer_id,
        }
    } else {
        None
    };

    let notification = effects.notify_owner.then(|| {
        fanout::status_notification(
            entity.id,
            &entity.email,
            entity.help_type.into(),
            entity.urgency.into(),
            to,
        )
    });

    let updated = repo
        .transition_status(id, from, to, volunteer_id, notification)
        .await?
        .ok_or_else(|| {
            // CAS matched zero rows: a concurrent transition won
            ApiError::Conflict("Help request was modified concurrently".to_string())
        })?;

    record_status_transition(&to.to_string());

    info!(
        request_id = %id,
        from = %from,
        to = %to,
        admin_initiated = principal.is_admin(),
        notified_owner = effects.notify_owner,
        "Help request status changed"
    );

    Ok((StatusCode::OK, Json(to_response(updated))))
}
