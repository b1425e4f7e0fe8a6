//! Availability probe results.

use super::{Candidate, PlaceId};

/// A candidate annotated with the outcome of one availability probe.
///
/// Produced exactly once per candidate per probe pass. A later attempt
/// produces a new value instead of patching this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub candidate: Candidate,

    /// Whether the slot can be booked at this venue.
    pub available: bool,

    /// True once the probe reached a conclusion; false if it failed first.
    pub checked: bool,

    /// Why the probe failed, when `checked` is false.
    pub error: Option<String>,
}

impl ProbeResult {
    /// A probe that reached a conclusion.
    pub fn concluded(candidate: Candidate, available: bool) -> Self {
        Self {
            candidate,
            available,
            checked: true,
            error: None,
        }
    }

    /// A probe that failed before concluding.
    pub fn failed(candidate: Candidate, error: impl Into<String>) -> Self {
        Self {
            candidate,
            available: false,
            checked: false,
            error: Some(error.into()),
        }
    }

    pub fn place_id(&self) -> &PlaceId {
        &self.candidate.place_id
    }

    /// Checked and bookable.
    pub fn is_confirmed_available(&self) -> bool {
        self.checked && self.available
    }

    /// Checked and not bookable.
    pub fn is_confirmed_unavailable(&self) -> bool {
        self.checked && !self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> Candidate {
        Candidate::new(PlaceId::parse("p1").unwrap(), "Arena")
    }

    #[test]
    fn concluded_results() {
        let yes = ProbeResult::concluded(candidate(), true);
        assert!(yes.is_confirmed_available());
        assert!(!yes.is_confirmed_unavailable());
        assert!(yes.error.is_none());

        let no = ProbeResult::concluded(candidate(), false);
        assert!(!no.is_confirmed_available());
        assert!(no.is_confirmed_unavailable());
    }

    #[test]
    fn failed_result_is_neither() {
        let failed = ProbeResult::failed(candidate(), "oracle timed out");
        assert!(!failed.checked);
        assert!(!failed.available);
        assert!(!failed.is_confirmed_available());
        assert!(!failed.is_confirmed_unavailable());
        assert_eq!(failed.error.as_deref(), Some("oracle timed out"));
        assert_eq!(failed.place_id().as_str(), "p1");
    }
}
