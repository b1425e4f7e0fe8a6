//! Conversion from Places DTOs to domain candidates, plus the local
//! filtering the directory applies before handing results to the search.

use tracing::debug;

use crate::domain::{Candidate, Coordinates, OpeningHours, PlaceId};
use crate::search::SearchFilters;

use super::types::{PlaceResult, TextSearchResponse};

/// Minimum rating applied when the caller gives no hint.
pub const DEFAULT_MIN_RATING: f64 = 4.0;

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// The place ID was blank or malformed
    #[error("invalid place id: {0:?}")]
    InvalidPlaceId(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Convert a single place to a candidate.
pub fn convert_place(place: &PlaceResult) -> Result<Candidate, ConversionError> {
    let place_id = PlaceId::parse(&place.place_id)
        .map_err(|_| ConversionError::InvalidPlaceId(place.place_id.clone()))?;

    if place.name.trim().is_empty() {
        return Err(ConversionError::MissingField("name"));
    }

    let address = place
        .formatted_address
        .as_deref()
        .or(place.vicinity.as_deref())
        .unwrap_or_default();

    let mut candidate = Candidate::new(place_id, place.name.clone()).with_address(address);
    candidate.rating = place.rating;
    candidate.user_ratings_total = place.user_ratings_total;
    candidate.location = place
        .geometry
        .as_ref()
        .map(|g| Coordinates::new(g.location.lat, g.location.lng));
    candidate.opening_hours = place.opening_hours.as_ref().map(|h| OpeningHours {
        open_now: h.open_now,
        weekday_text: h.weekday_text.clone(),
    });
    candidate.price_level = place.price_level;
    candidate.types = place.types.clone();
    candidate.photo_reference = place.photos.first().map(|p| p.photo_reference.clone());

    Ok(candidate)
}

/// Convert every place in a response, skipping the ones that fail.
pub fn convert_response(response: &TextSearchResponse) -> Vec<Candidate> {
    response
        .results
        .iter()
        .filter_map(|place| match convert_place(place) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                debug!(place_id = %place.place_id, error = %e, "skipping place");
                None
            }
        })
        .collect()
}

/// Popularity used to order directory results.
///
/// A venue with no review count is treated as having one review.
pub fn popularity(candidate: &Candidate) -> f64 {
    let rating = candidate.rating.unwrap_or(0.0);
    let total = candidate.user_ratings_total.unwrap_or(0).max(1);
    rating * (f64::from(total) + 1.0).log10()
}

/// Drop poorly rated and closed venues, order by popularity and apply the
/// limit from `filters`.
pub fn apply_filters(candidates: Vec<Candidate>, filters: &SearchFilters) -> Vec<Candidate> {
    let min_rating = filters.min_rating.unwrap_or(DEFAULT_MIN_RATING);

    let mut kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| c.rating.unwrap_or(0.0) >= min_rating)
        .filter(|c| !c.is_closed_now())
        .collect();

    kept.sort_by(|a, b| popularity(b).total_cmp(&popularity(a)));

    if let Some(limit) = filters.limit {
        kept.truncate(limit);
    }
    kept
}
