//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveTime};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::availability::TracingSink;
use crate::domain::{PlaceId, SearchQuery};
use crate::ranking::rank_venues;
use crate::reservations::{NewReservation, ReservationError, ReservationId};
use crate::search::{AlternativeSearch, SearchError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search_venues))
        .route("/reservations", post(create_reservation))
        .route("/reservations/:id", get(get_reservation))
        .route("/reservations/:id/confirm", post(confirm_reservation))
        .route("/reservations/:id/cancel", post(cancel_reservation))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search for available venues, widening the search when none are free,
/// and rank what was found.
async fn search_venues(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let mut query = SearchQuery::parse(&req.sport, &req.location, &req.date, &req.time)
        .map_err(SearchError::from)?
        .with_preferences(req.preferences.into());
    if let Some(location) = req.user_location {
        query = query.with_user_location(location.into());
    }
    if let Some(limit) = req.limit {
        query = query.with_limit(limit);
    }
    if let Some(max_attempts) = req.max_attempts {
        query = query.with_max_attempts(max_attempts);
    }

    let search = AlternativeSearch::new(
        state.directory.as_ref(),
        &state.reservations,
        &state.oracle,
        state.config.as_ref(),
    );
    let outcome = search
        .search_with_auto_alternatives(&query, Some(&TracingSink))
        .await?;

    let available = rank_venues(
        outcome.available.clone(),
        query.user_location,
        &query.preferences,
    );
    let unavailable = rank_venues(
        outcome.unavailable.clone(),
        query.user_location,
        &query.preferences,
    );

    info!(
        sport = %query.sport,
        available = available.len(),
        unavailable = unavailable.len(),
        errored = outcome.errored.len(),
        "search complete"
    );

    let directory = state.directory.inner();
    Ok(Json(SearchResponse::from_ranked(
        &outcome,
        &available,
        &unavailable,
        |reference| directory.photo_url(reference),
    )))
}

/// Book a slot at a venue.
async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResult>), AppError> {
    let place_id = PlaceId::parse(&req.place_id).map_err(|_| AppError::BadRequest {
        message: format!("Invalid place id: {:?}", req.place_id),
    })?;
    let date = NaiveDate::parse_from_str(req.date.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest {
            message: format!("Invalid date: {}", req.date),
        }
    })?;
    let time = NaiveTime::parse_from_str(req.time.trim(), "%H:%M").map_err(|_| {
        AppError::BadRequest {
            message: format!("Invalid time: {}", req.time),
        }
    })?;

    let reservation = state
        .reservations
        .create(NewReservation {
            place_id,
            venue_name: req.venue_name,
            date,
            time,
            customer_name: req.customer_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ReservationResult>, AppError> {
    let id = ReservationId(id);
    let reservation = state
        .reservations
        .get(id)
        .await
        .ok_or(ReservationError::NotFound(id))?;
    Ok(Json(reservation.into()))
}

async fn confirm_reservation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ReservationResult>, AppError> {
    let reservation = state.reservations.confirm(ReservationId(id)).await?;
    Ok(Json(reservation.into()))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ReservationResult>, AppError> {
    let reservation = state.reservations.cancel(ReservationId(id)).await?;
    Ok(Json(reservation.into()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidQuery(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<ReservationError> for AppError {
    fn from(e: ReservationError) -> Self {
        let message = e.to_string();
        match e {
            ReservationError::NotFound(_) => AppError::NotFound { message },
            ReservationError::SlotTaken(_) | ReservationError::InvalidTransition { .. } => {
                AppError::Conflict { message }
            }
            ReservationError::Invalid(_) => AppError::BadRequest { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
        };

        warn!(%status, %message, "request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
