//! Search queries.

use chrono::{NaiveDate, NaiveTime};

use super::{Coordinates, QueryError};

/// Largest per-call candidate limit a query may ask for.
pub const MAX_LIMIT: usize = 60;

/// Most widening attempts a query may ask for. Every attempt costs at least
/// one directory call.
pub const MAX_ATTEMPTS: usize = 10;

/// Optional ranking preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    /// Boost venues rated 4.5 or higher.
    pub prefer_high_rating: bool,

    /// Boost venues close to the user.
    pub prefer_nearby: bool,
}

/// A user's booking request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub sport: String,

    /// Free text, passed through to the provider.
    pub location: String,

    pub date: NaiveDate,

    pub time: NaiveTime,

    pub user_location: Option<Coordinates>,

    pub preferences: Preferences,

    /// Candidates to request per provider call. Falls back to the search
    /// configuration when unset.
    pub limit: Option<usize>,

    /// Widening attempts. Falls back to the search configuration when unset.
    pub max_attempts: Option<usize>,
}

impl SearchQuery {
    /// Create a query for a slot.
    pub fn new(
        sport: impl Into<String>,
        location: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            sport: sport.into(),
            location: location.into(),
            date,
            time,
            user_location: None,
            preferences: Preferences::default(),
            limit: None,
            max_attempts: None,
        }
    }

    /// Parse a query from raw strings.
    ///
    /// `date` must be `YYYY-MM-DD` and `time` must be `HH:MM`. The returned
    /// query has already been validated.
    ///
    /// # Examples
    ///
    /// ```
    /// use venue_server::domain::SearchQuery;
    ///
    /// let q = SearchQuery::parse("Futsal", "Jakarta Selatan", "2025-11-20", "18:00").unwrap();
    /// assert_eq!(q.time.to_string(), "18:00:00");
    ///
    /// assert!(SearchQuery::parse("Futsal", "Jakarta", "20/11/2025", "18:00").is_err());
    /// assert!(SearchQuery::parse("", "Jakarta", "2025-11-20", "18:00").is_err());
    /// ```
    pub fn parse(sport: &str, location: &str, date: &str, time: &str) -> Result<Self, QueryError> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| QueryError::InvalidDate(date.to_string()))?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|_| QueryError::InvalidTime(time.to_string()))?;

        let query = Self::new(sport.trim(), location.trim(), date, time);
        query.validate()?;
        Ok(query)
    }

    pub fn with_user_location(mut self, location: Coordinates) -> Self {
        self.user_location = Some(location);
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Check the query can be run at all.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.sport.trim().is_empty() {
            return Err(QueryError::MissingSport);
        }

        if self.location.trim().is_empty() {
            return Err(QueryError::MissingLocation);
        }

        match self.limit {
            Some(0) => return Err(QueryError::ZeroLimit),
            Some(limit) if limit > MAX_LIMIT => {
                return Err(QueryError::LimitTooLarge {
                    limit,
                    max: MAX_LIMIT,
                });
            }
            _ => {}
        }

        if let Some(attempts) = self.max_attempts.filter(|&n| n > MAX_ATTEMPTS) {
            return Err(QueryError::TooManyAttempts {
                attempts,
                max: MAX_ATTEMPTS,
            });
        }

        if let Some(Coordinates { lat, lng }) = self.user_location {
            let valid = lat.is_finite()
                && lng.is_finite()
                && (-90.0..=90.0).contains(&lat)
                && (-180.0..=180.0).contains(&lng);
            if !valid {
                return Err(QueryError::InvalidCoordinates { lat, lng });
            }
        }

        Ok(())
    }
}
