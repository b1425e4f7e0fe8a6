//! Venue identifier type.

use std::fmt;

/// Error returned when parsing an invalid place identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid place id: {reason}")]
pub struct InvalidPlaceId {
    reason: &'static str,
}

/// Opaque, stable identifier of a venue in the directory.
///
/// The directory assigns these; this crate only compares them. Any non-blank
/// string without surrounding whitespace is accepted.
///
/// # Examples
///
/// ```
/// use venue_server::domain::PlaceId;
///
/// let id = PlaceId::parse("ChIJN1t_tDeuEmsRUsoyG83frY4").unwrap();
/// assert_eq!(id.as_str(), "ChIJN1t_tDeuEmsRUsoyG83frY4");
///
/// assert!(PlaceId::parse("").is_err());
/// assert!(PlaceId::parse("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceId(String);

impl PlaceId {
    /// Parse a place identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidPlaceId> {
        if s.trim().is_empty() {
            return Err(InvalidPlaceId {
                reason: "must not be blank",
            });
        }

        if s.trim() != s {
            return Err(InvalidPlaceId {
                reason: "must not have surrounding whitespace",
            });
        }

        Ok(PlaceId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlaceId({})", self.0)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
