//! Domain error types.
//!
//! These errors represent validation failures of user input. They are
//! distinct from provider and I/O errors, which degrade into data.

/// A search query that cannot be run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("sport must not be empty")]
    MissingSport,

    #[error("location must not be empty")]
    MissingLocation,

    /// Date was not in `YYYY-MM-DD` form
    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Time was not in `HH:MM` form
    #[error("invalid time {0:?}: expected HH:MM")]
    InvalidTime(String),

    #[error("limit must be at least 1")]
    ZeroLimit,

    #[error("limit {limit} exceeds the maximum of {max}")]
    LimitTooLarge { limit: usize, max: usize },

    /// More widening attempts than the server allows
    #[error("max_attempts {attempts} exceeds the maximum of {max}")]
    TooManyAttempts { attempts: usize, max: usize },

    /// Latitude or longitude outside the valid range
    #[error("invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { lat: f64, lng: f64 },
}
