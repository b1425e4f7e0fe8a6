//! Score components.
//!
//! A venue's score is the sum of four components, worth at most 30 + 25 +
//! 25 + 20 = 100 points, optionally boosted by preference multipliers and
//! then rounded and capped at 100. The breakdown always reports the
//! components before any multiplier.

use crate::domain::{Coordinates, Preferences, ProbeResult};
use crate::geo::{DEFAULT_MAX_DISTANCE_KM, distance_between, distance_score};

pub const RATING_WEIGHT: f64 = 30.0;
pub const DISTANCE_WEIGHT: f64 = 25.0;
pub const AVAILABILITY_WEIGHT: f64 = 25.0;

/// Distance component when the distance is unknown: half marks.
pub const NEUTRAL_DISTANCE: f64 = 12.5;

const HIGH_RATING: f64 = 4.5;
const HIGH_RATING_BOOST: f64 = 1.10;
const NEARBY_COMPONENT: f64 = 20.0;
const NEARBY_BOOST: f64 = 1.05;

/// Review count thresholds and their points, highest first.
const REVIEW_STEPS: [(u32, f64); 6] = [
    (500, 20.0),
    (200, 18.0),
    (100, 15.0),
    (50, 12.0),
    (20, 8.0),
    (10, 5.0),
];

/// The four unmultiplied score components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub rating: f64,
    pub distance: f64,
    pub availability: f64,
    pub reviews: f64,
}

impl ScoreBreakdown {
    /// Sum of the components, added in display order.
    pub fn total(&self) -> f64 {
        self.rating + self.distance + self.availability + self.reviews
    }
}

/// A computed score with its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VenueScore {
    /// Final score, 0 to 100.
    pub score: u8,

    pub breakdown: ScoreBreakdown,

    /// Distance from the user, when both locations are known.
    pub distance_km: Option<f64>,
}

/// Up to 30 points, proportional to the rating. Unrated venues get 0.
pub fn rating_score(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) if r > 0.0 => (r / 5.0) * RATING_WEIGHT,
        _ => 0.0,
    }
}

/// Up to 25 points for proximity, given a distance in km.
///
/// Unknown distances get [`NEUTRAL_DISTANCE`].
pub fn distance_component(distance_km: Option<f64>) -> f64 {
    match distance_km {
        Some(d) => (f64::from(distance_score(d, DEFAULT_MAX_DISTANCE_KM)) / 100.0) * DISTANCE_WEIGHT,
        None => NEUTRAL_DISTANCE,
    }
}

/// 25 points if bookable, else 0.
pub fn availability_score(available: bool) -> f64 {
    if available { AVAILABILITY_WEIGHT } else { 0.0 }
}

/// Up to 20 points, stepped by review volume.
///
/// Fewer than ten reviews earn half a point each.
///
/// # Examples
///
/// ```
/// use venue_server::ranking::reviews_score;
///
/// assert_eq!(reviews_score(Some(500)), 20.0);
/// assert_eq!(reviews_score(Some(99)), 12.0);
/// assert_eq!(reviews_score(Some(5)), 2.5);
/// assert_eq!(reviews_score(None), 0.0);
/// ```
pub fn reviews_score(count: Option<u32>) -> f64 {
    let count = match count {
        Some(c) if c > 0 => c,
        _ => return 0.0,
    };

    for (threshold, points) in REVIEW_STEPS {
        if count >= threshold {
            return points;
        }
    }

    ((f64::from(count) / 10.0) * 5.0).min(5.0)
}

/// Score one probed venue.
pub fn score_venue(
    venue: &ProbeResult,
    user_location: Option<Coordinates>,
    preferences: &Preferences,
) -> VenueScore {
    let candidate = &venue.candidate;

    let distance_km = match (user_location, candidate.location) {
        (Some(user), Some(place)) => Some(distance_between(user, place)),
        _ => None,
    };

    let breakdown = ScoreBreakdown {
        rating: rating_score(candidate.rating),
        distance: distance_component(distance_km),
        availability: availability_score(venue.available),
        reviews: reviews_score(candidate.user_ratings_total),
    };

    let mut raw = breakdown.total();

    if preferences.prefer_high_rating && candidate.rating.is_some_and(|r| r >= HIGH_RATING) {
        raw *= HIGH_RATING_BOOST;
    }
    if preferences.prefer_nearby && breakdown.distance >= NEARBY_COMPONENT {
        raw *= NEARBY_BOOST;
    }

    VenueScore {
        score: raw.round().clamp(0.0, 100.0) as u8,
        breakdown,
        distance_km,
    }
}
