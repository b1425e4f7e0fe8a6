//! Collaborators consulted by availability probes.

use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveTime};

use crate::domain::{Candidate, PlaceId};

/// Error from a single availability probe.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProbeError {
    /// The reservation store could not be queried
    #[error("reservation lookup failed: {0}")]
    Reservations(String),

    /// The availability oracle failed
    #[error("availability check failed: {0}")]
    Oracle(String),

    /// The probe did not finish in time
    #[error("availability check timed out after {0} ms")]
    Timeout(u64),
}

/// Looks up existing reservations.
pub trait ConflictChecker {
    /// True if a pending or confirmed reservation already holds this slot.
    fn has_active_conflict(
        &self,
        place_id: &PlaceId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> impl Future<Output = Result<bool, ProbeError>> + Send;
}

/// The authoritative real-world availability check.
///
/// Implementations may call a venue's booking system or apply a heuristic.
/// The probe treats the answer as final and does not retry.
pub trait AvailabilityOracle {
    fn probe(
        &self,
        candidate: &Candidate,
        date: NaiveDate,
        time: NaiveTime,
    ) -> impl Future<Output = Result<bool, ProbeError>> + Send;
}

/// Deterministic stand-in for a venue booking integration.
///
/// Hashes the venue and slot and reports roughly `available_ratio` of slots
/// as free. The same venue and slot always get the same answer.
#[derive(Debug, Clone, Copy)]
pub struct HashedOracle {
    available_ratio: f64,
}

impl HashedOracle {
    pub fn new(available_ratio: f64) -> Self {
        Self {
            available_ratio: available_ratio.clamp(0.0, 1.0),
        }
    }

    fn bucket(candidate: &Candidate, date: NaiveDate, time: NaiveTime) -> f64 {
        let mut hasher = DefaultHasher::new();
        candidate.place_id.hash(&mut hasher);
        date.hash(&mut hasher);
        time.hash(&mut hasher);
        (hasher.finish() % 10_000) as f64 / 10_000.0
    }
}

impl Default for HashedOracle {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl AvailabilityOracle for HashedOracle {
    async fn probe(
        &self,
        candidate: &Candidate,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, ProbeError> {
        Ok(Self::bucket(candidate, date, time) < self.available_ratio)
    }
}
