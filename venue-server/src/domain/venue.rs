//! Venue candidates as returned by the directory.

use super::PlaceId;

/// A point on the earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Opening hours as reported by the directory.
///
/// Only the "open now" flag influences availability; the weekday text is
/// carried through for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpeningHours {
    /// Whether the venue is open at the moment the directory was queried.
    /// `None` when the directory did not say.
    pub open_now: Option<bool>,

    /// Human-readable opening hours, one line per weekday.
    pub weekday_text: Vec<String>,
}

impl OpeningHours {
    /// Opening hours with only the "open now" flag set.
    pub fn open_now(open: bool) -> Self {
        Self {
            open_now: Some(open),
            weekday_text: Vec::new(),
        }
    }

    /// True only if the directory explicitly reports the venue as closed.
    pub fn is_explicitly_closed(&self) -> bool {
        self.open_now == Some(false)
    }
}

/// A venue as seen by the search pipeline.
///
/// Candidates are immutable once obtained from the provider; probing and
/// ranking wrap them in new values rather than modifying them.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Unique key across a search.
    pub place_id: PlaceId,

    pub name: String,

    pub address: String,

    /// Average rating, 0.0 to 5.0.
    pub rating: Option<f64>,

    /// Number of user ratings behind `rating`.
    pub user_ratings_total: Option<u32>,

    /// Venue location. Latitude and longitude are either both known or both
    /// unknown.
    pub location: Option<Coordinates>,

    pub opening_hours: Option<OpeningHours>,

    /// Directory price bracket (0 = free, 4 = very expensive).
    pub price_level: Option<u8>,

    /// Directory category tags (e.g. "gym", "point_of_interest").
    pub types: Vec<String>,

    /// Reference for fetching the first photo from the directory.
    pub photo_reference: Option<String>,
}

impl Candidate {
    /// Create a candidate with only its identity set.
    pub fn new(place_id: PlaceId, name: impl Into<String>) -> Self {
        Self {
            place_id,
            name: name.into(),
            address: String::new(),
            rating: None,
            user_ratings_total: None,
            location: None,
            opening_hours: None,
            price_level: None,
            types: Vec::new(),
            photo_reference: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_user_ratings_total(mut self, total: u32) -> Self {
        self.user_ratings_total = Some(total);
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(Coordinates::new(lat, lng));
        self
    }

    pub fn with_opening_hours(mut self, hours: OpeningHours) -> Self {
        self.opening_hours = Some(hours);
        self
    }

    /// True if the directory explicitly reports the venue as closed now.
    pub fn is_closed_now(&self) -> bool {
        self.opening_hours
            .as_ref()
            .is_some_and(OpeningHours::is_explicitly_closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PlaceId {
        PlaceId::parse(s).unwrap()
    }

    #[test]
    fn builder_sets_fields() {
        let c = Candidate::new(id("p1"), "Arena")
            .with_address("Jl. Sudirman 1")
            .with_rating(4.5)
            .with_user_ratings_total(120)
            .with_location(-6.2, 106.8);

        assert_eq!(c.name, "Arena");
        assert_eq!(c.address, "Jl. Sudirman 1");
        assert_eq!(c.rating, Some(4.5));
        assert_eq!(c.user_ratings_total, Some(120));
        assert_eq!(c.location, Some(Coordinates::new(-6.2, 106.8)));
        assert!(c.opening_hours.is_none());
    }

    #[test]
    fn closed_now_only_when_explicit() {
        let base = Candidate::new(id("p1"), "Arena");
        assert!(!base.is_closed_now());

        let unknown = base.clone().with_opening_hours(OpeningHours::default());
        assert!(!unknown.is_closed_now());

        let open = base.clone().with_opening_hours(OpeningHours::open_now(true));
        assert!(!open.is_closed_now());

        let closed = base.with_opening_hours(OpeningHours::open_now(false));
        assert!(closed.is_closed_now());
    }
}
