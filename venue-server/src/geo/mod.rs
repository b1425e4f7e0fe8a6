//! Great-circle distance and distance-based scoring.
//!
//! Everything here is pure. Rounding uses `f64::round` (half away from zero);
//! every value rounded here is non-negative, so this matches rounding half up.

use std::fmt;

use crate::domain::Coordinates;

/// Mean earth radius used for all distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance at which the distance score reaches zero, unless overridden.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 20.0;

/// Haversine distance between two points given in degrees, rounded to
/// two decimal places.
///
/// # Examples
///
/// ```
/// use venue_server::geo::distance_km;
///
/// assert_eq!(distance_km(-6.2, 106.8, -6.2, 106.8), 0.0);
/// assert_eq!(
///     distance_km(-6.2, 106.8, -6.3, 106.9),
///     distance_km(-6.3, 106.9, -6.2, 106.8),
/// );
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + lat1.to_radians().cos()
            * lat2.to_radians().cos()
            * (d_lon / 2.0).sin()
            * (d_lon / 2.0).sin();
    let a = a.min(1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_KM * c * 100.0).round() / 100.0
}

/// Distance between two coordinates. See [`distance_km`].
pub fn distance_between(a: Coordinates, b: Coordinates) -> f64 {
    distance_km(a.lat, a.lng, b.lat, b.lng)
}

/// Map a distance onto 0..=100 with linear decay.
///
/// 100 at zero distance, 0 at or beyond `max_distance_km`.
pub fn distance_score(distance_km: f64, max_distance_km: f64) -> u8 {
    if distance_km >= max_distance_km {
        return 0;
    }

    let score = ((1.0 - distance_km / max_distance_km) * 100.0).round();
    score.clamp(0.0, 100.0) as u8
}

/// Coarse distance classification for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceBand {
    VeryNear,
    Near,
    Medium,
    Far,
    VeryFar,
}

impl DistanceBand {
    pub fn of(distance_km: f64) -> Self {
        match distance_km {
            d if d < 2.0 => DistanceBand::VeryNear,
            d if d < 5.0 => DistanceBand::Near,
            d if d < 10.0 => DistanceBand::Medium,
            d if d < 20.0 => DistanceBand::Far,
            _ => DistanceBand::VeryFar,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DistanceBand::VeryNear => "very near",
            DistanceBand::Near => "near",
            DistanceBand::Medium => "medium",
            DistanceBand::Far => "far",
            DistanceBand::VeryFar => "very far",
        }
    }
}

impl fmt::Display for DistanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Format a distance for display: metres under 1 km, kilometres otherwise.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km * 1000.0).round() as u64)
    } else {
        format!("{distance_km} km")
    }
}
