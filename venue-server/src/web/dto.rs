//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, Preferences, ProbeResult};
use crate::geo::{DistanceBand, format_distance};
use crate::ranking::{ScoreBreakdown, ScoredVenue};
use crate::reservations::{Reservation, ReservationStatus};
use crate::search::{SearchOutcome, SearchStatus};

/// Request to search for venues.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Sport, e.g. "futsal"
    pub sport: String,

    /// Area to search, free text
    pub location: String,

    /// Date in YYYY-MM-DD format
    pub date: String,

    /// Time in HH:MM format
    pub time: String,

    /// The user's position, for distance scoring
    pub user_location: Option<LocationDto>,

    #[serde(default)]
    pub preferences: PreferencesDto,

    /// Candidates requested per directory call
    pub limit: Option<usize>,

    /// Widening attempts
    pub max_attempts: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LocationDto {
    pub lat: f64,
    pub lng: f64,
}

impl From<LocationDto> for Coordinates {
    fn from(dto: LocationDto) -> Self {
        Coordinates::new(dto.lat, dto.lng)
    }
}

impl From<Coordinates> for LocationDto {
    fn from(c: Coordinates) -> Self {
        Self {
            lat: c.lat,
            lng: c.lng,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PreferencesDto {
    pub prefer_high_rating: bool,
    pub prefer_nearby: bool,
}

impl From<PreferencesDto> for Preferences {
    fn from(dto: PreferencesDto) -> Self {
        Preferences {
            prefer_high_rating: dto.prefer_high_rating,
            prefer_nearby: dto.prefer_nearby,
        }
    }
}

/// Response for venue search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// "found" or "exhausted"
    pub status: &'static str,

    /// Widening attempts made
    pub attempts_used: usize,

    /// Whether the search was cut short
    pub cancelled: bool,

    /// Available venues, best first
    pub available: Vec<VenueResult>,

    /// Unavailable venues, best first
    pub unavailable: Vec<VenueResult>,

    /// Venues that could not be checked
    pub errored: Vec<ErroredVenue>,
}

impl SearchResponse {
    /// Build the response. `photo_url` turns a directory photo reference
    /// into a fetchable URL, if the directory serves photos.
    pub fn from_ranked(
        outcome: &SearchOutcome,
        available: &[ScoredVenue],
        unavailable: &[ScoredVenue],
        photo_url: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let venue = |scored: &ScoredVenue| {
            let photo = scored
                .venue
                .candidate
                .photo_reference
                .as_deref()
                .and_then(&photo_url);
            VenueResult::from_scored(scored, photo)
        };
        Self {
            status: match outcome.status {
                SearchStatus::Found => "found",
                SearchStatus::Exhausted => "exhausted",
            },
            attempts_used: outcome.attempts_used,
            cancelled: outcome.cancelled,
            available: available.iter().map(venue).collect(),
            unavailable: unavailable.iter().map(venue).collect(),
            errored: outcome.errored.iter().map(ErroredVenue::from_probe).collect(),
        }
    }
}

/// A ranked venue.
#[derive(Debug, Serialize)]
pub struct VenueResult {
    pub place_id: String,

    pub name: String,

    pub address: String,

    pub rating: Option<f64>,

    pub user_ratings_total: Option<u32>,

    pub location: Option<LocationDto>,

    pub price_level: Option<u8>,

    pub open_now: Option<bool>,

    pub available: bool,

    /// Overall score, 0 to 100
    pub score: u8,

    pub breakdown: BreakdownResult,

    /// Distance from the user in km
    pub distance_km: Option<f64>,

    /// e.g. "850 m" or "3.25 km"
    pub distance_text: Option<String>,

    /// e.g. "very near"
    pub distance_label: Option<&'static str>,

    /// First directory photo, when available
    pub photo_url: Option<String>,
}

impl VenueResult {
    pub fn from_scored(scored: &ScoredVenue, photo_url: Option<String>) -> Self {
        let candidate = &scored.venue.candidate;
        Self {
            place_id: candidate.place_id.as_str().to_string(),
            name: candidate.name.clone(),
            address: candidate.address.clone(),
            rating: candidate.rating,
            user_ratings_total: candidate.user_ratings_total,
            location: candidate.location.map(LocationDto::from),
            price_level: candidate.price_level,
            open_now: candidate.opening_hours.as_ref().and_then(|h| h.open_now),
            available: scored.venue.available,
            score: scored.score,
            breakdown: BreakdownResult::from(&scored.breakdown),
            distance_km: scored.distance_km,
            distance_text: scored.distance_km.map(format_distance),
            distance_label: scored.distance_km.map(|d| DistanceBand::of(d).label()),
            photo_url,
        }
    }
}

/// Score components before preference boosts.
#[derive(Debug, Serialize)]
pub struct BreakdownResult {
    pub rating: f64,
    pub distance: f64,
    pub availability: f64,
    pub reviews: f64,
}

impl From<&ScoreBreakdown> for BreakdownResult {
    fn from(b: &ScoreBreakdown) -> Self {
        Self {
            rating: b.rating,
            distance: b.distance,
            availability: b.availability,
            reviews: b.reviews,
        }
    }
}

/// A venue whose availability check failed.
#[derive(Debug, Serialize)]
pub struct ErroredVenue {
    pub place_id: String,
    pub name: String,
    pub error: Option<String>,
}

impl ErroredVenue {
    pub fn from_probe(probe: &ProbeResult) -> Self {
        Self {
            place_id: probe.place_id().as_str().to_string(),
            name: probe.candidate.name.clone(),
            error: probe.error.clone(),
        }
    }
}

/// Request to book a slot.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub place_id: String,

    #[serde(default)]
    pub venue_name: String,

    /// Date in YYYY-MM-DD format
    pub date: String,

    /// Time in HH:MM format
    pub time: String,

    pub customer_name: String,
}

/// A reservation.
#[derive(Debug, Serialize)]
pub struct ReservationResult {
    pub id: u64,
    pub place_id: String,
    pub venue_name: String,
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResult {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id.0,
            place_id: r.place_id.as_str().to_string(),
            venue_name: r.venue_name,
            date: r.date.format("%Y-%m-%d").to_string(),
            time: r.time.format("%H:%M").to_string(),
            customer_name: r.customer_name,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
