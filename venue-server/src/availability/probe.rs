//! Concurrent availability probing.
//!
//! Every candidate gets its own probe future and all of them are polled
//! together. A probe only returns a value; it never touches shared state, so
//! one failing probe cannot disturb its siblings.

use std::future::Future;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::{debug, info, warn};

use crate::domain::{Candidate, ProbeResult};

use super::oracle::{AvailabilityOracle, ConflictChecker, ProbeError};
use super::progress::{ProgressEvent, ProgressSink, notify};

/// Checks candidate availability for one slot.
pub struct AvailabilityProbe<'a, C: ConflictChecker, O: AvailabilityOracle> {
    conflicts: &'a C,
    oracle: &'a O,
    timeout: Option<Duration>,
}

impl<'a, C: ConflictChecker, O: AvailabilityOracle> AvailabilityProbe<'a, C, O> {
    pub fn new(conflicts: &'a C, oracle: &'a O) -> Self {
        Self {
            conflicts,
            oracle,
            timeout: None,
        }
    }

    /// Fail any single probe that takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Probe every candidate concurrently.
    ///
    /// Returns exactly one result per candidate, in completion order.
    pub async fn check_all(
        &self,
        candidates: Vec<Candidate>,
        date: NaiveDate,
        time: NaiveTime,
        sink: Option<&dyn ProgressSink>,
    ) -> Vec<ProbeResult> {
        self.check_until(candidates, date, time, sink, std::future::pending())
            .await
    }

    /// Probe every candidate concurrently, giving up when `stop` resolves.
    ///
    /// Results that completed before `stop` are returned; probes still in
    /// flight are dropped and produce nothing.
    pub async fn check_until(
        &self,
        candidates: Vec<Candidate>,
        date: NaiveDate,
        time: NaiveTime,
        sink: Option<&dyn ProgressSink>,
        stop: impl Future<Output = ()>,
    ) -> Vec<ProbeResult> {
        let total = candidates.len();
        info!(venues = total, %date, %time, "checking availability");

        let mut in_flight: FuturesUnordered<_> = candidates
            .into_iter()
            .map(|candidate| self.check_one(candidate, date, time, sink))
            .collect();

        let mut results = Vec::with_capacity(total);
        tokio::pin!(stop);

        loop {
            tokio::select! {
                biased;
                next = in_flight.next() => match next {
                    Some(result) => results.push(result),
                    None => break,
                },
                _ = &mut stop => {
                    warn!(
                        completed = results.len(),
                        abandoned = total - results.len(),
                        "availability check stopped early"
                    );
                    break;
                }
            }
        }

        results
    }

    async fn check_one(
        &self,
        candidate: Candidate,
        date: NaiveDate,
        time: NaiveTime,
        sink: Option<&dyn ProgressSink>,
    ) -> ProbeResult {
        notify(
            sink,
            ProgressEvent::Checking {
                candidate: candidate.clone(),
            },
        );

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.availability(&candidate, date, time))
                .await
                .unwrap_or(Err(ProbeError::Timeout(limit.as_millis() as u64))),
            None => self.availability(&candidate, date, time).await,
        };

        match outcome {
            Ok(available) => {
                debug!(place_id = %candidate.place_id, available, "venue checked");
                notify(
                    sink,
                    ProgressEvent::Resolved {
                        candidate: candidate.clone(),
                        available,
                    },
                );
                ProbeResult::concluded(candidate, available)
            }
            Err(e) => {
                warn!(
                    place_id = %candidate.place_id,
                    name = %candidate.name,
                    error = %e,
                    "venue check failed"
                );
                notify(
                    sink,
                    ProgressEvent::Failed {
                        candidate: candidate.clone(),
                        error: e.to_string(),
                    },
                );
                ProbeResult::failed(candidate, e.to_string())
            }
        }
    }

    /// Reservation conflicts first, then opening hours, then the oracle.
    async fn availability(
        &self,
        candidate: &Candidate,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, ProbeError> {
        if self
            .conflicts
            .has_active_conflict(&candidate.place_id, date, time)
            .await?
        {
            debug!(place_id = %candidate.place_id, "slot already reserved");
            return Ok(false);
        }

        if candidate.is_closed_now() {
            debug!(place_id = %candidate.place_id, "venue reports closed");
            return Ok(false);
        }

        self.oracle.probe(candidate, date, time).await
    }
}

/// Results that were checked and are bookable.
pub fn available_of(results: &[ProbeResult]) -> Vec<ProbeResult> {
    results
        .iter()
        .filter(|r| r.is_confirmed_available())
        .cloned()
        .collect()
}

/// Results that were checked and are not bookable.
///
/// Failed probes are in neither this set nor [`available_of`].
pub fn unavailable_of(results: &[ProbeResult]) -> Vec<ProbeResult> {
    results
        .iter()
        .filter(|r| r.is_confirmed_unavailable())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OpeningHours, PlaceId};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
    }

    fn time() -> NaiveTime {
        NaiveTime::from_hms_opt(18, 0, 0).unwrap()
    }

    fn candidate(id: &str) -> Candidate {
        Candidate::new(PlaceId::parse(id).unwrap(), format!("Venue {id}"))
    }

    fn candidates(n: usize) -> Vec<Candidate> {
        (1..=n).map(|i| candidate(&format!("v{i}"))).collect()
    }

    /// Conflict checker with a fixed set of reserved venues.
    #[derive(Default)]
    struct Reserved {
        reserved: HashSet<String>,
        broken: HashSet<String>,
    }

    impl ConflictChecker for Reserved {
        async fn has_active_conflict(
            &self,
            place_id: &PlaceId,
            _date: NaiveDate,
            _time: NaiveTime,
        ) -> Result<bool, ProbeError> {
            if self.broken.contains(place_id.as_str()) {
                return Err(ProbeError::Reservations("connection reset".into()));
            }
            Ok(self.reserved.contains(place_id.as_str()))
        }
    }

    /// Oracle with scripted answers; unknown venues are available.
    #[derive(Default)]
    struct Scripted {
        answers: HashMap<String, Result<bool, String>>,
        delay: Option<Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn answer(mut self, id: &str, answer: Result<bool, &str>) -> Self {
            self.answers
                .insert(id.to_string(), answer.map_err(str::to_string));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AvailabilityOracle for Scripted {
        async fn probe(
            &self,
            candidate: &Candidate,
            _date: NaiveDate,
            _time: NaiveTime,
        ) -> Result<bool, ProbeError> {
            self.calls
                .lock()
                .unwrap()
                .push(candidate.place_id.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.answers.get(candidate.place_id.as_str()) {
                Some(Ok(available)) => Ok(*available),
                Some(Err(message)) => Err(ProbeError::Oracle(message.clone())),
                None => Ok(true),
            }
        }
    }

    fn by_id(results: &[ProbeResult]) -> HashMap<String, ProbeResult> {
        results
            .iter()
            .map(|r| (r.place_id().to_string(), r.clone()))
            .collect()
    }

    #[tokio::test]
    async fn one_result_per_candidate() {
        let conflicts = Reserved::default();
        let oracle = Scripted::default().answer("v2", Ok(false));
        let probe = AvailabilityProbe::new(&conflicts, &oracle);

        let results = probe.check_all(candidates(4), date(), time(), None).await;

        assert_eq!(results.len(), 4);
        let map = by_id(&results);
        assert_eq!(map.len(), 4);
        assert!(map["v1"].is_confirmed_available());
        assert!(map["v2"].is_confirmed_unavailable());
    }

    #[tokio::test]
    async fn failing_oracle_is_isolated() {
        let conflicts = Reserved::default();
        let oracle = Scripted::default().answer("v3", Err("venue API returned 500"));
        let probe = AvailabilityProbe::new(&conflicts, &oracle);

        let results = probe.check_all(candidates(5), date(), time(), None).await;

        assert_eq!(results.len(), 5);
        let failed: Vec<_> = results.iter().filter(|r| !r.checked).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].place_id().as_str(), "v3");
        assert!(!failed[0].available);
        assert!(
            failed[0]
                .error
                .as_deref()
                .is_some_and(|e| e.contains("venue API returned 500"))
        );

        let others: Vec<_> = results.iter().filter(|r| r.checked).collect();
        assert_eq!(others.len(), 4);
        assert!(others.iter().all(|r| r.available && r.error.is_none()));
    }

    #[tokio::test]
    async fn failing_conflict_lookup_is_isolated() {
        let conflicts = Reserved {
            broken: HashSet::from(["v1".to_string()]),
            ..Default::default()
        };
        let oracle = Scripted::default();
        let probe = AvailabilityProbe::new(&conflicts, &oracle);

        let results = probe.check_all(candidates(3), date(), time(), None).await;
        let map = by_id(&results);

        assert!(!map["v1"].checked);
        assert!(map["v2"].checked && map["v3"].checked);
        // Oracle never consulted for the venue whose lookup failed
        assert!(!oracle.calls().contains(&"v1".to_string()));
    }

    #[tokio::test]
    async fn reservation_conflict_short_circuits() {
        let conflicts = Reserved {
            reserved: HashSet::from(["v1".to_string()]),
            ..Default::default()
        };
        let oracle = Scripted::default();
        let probe = AvailabilityProbe::new(&conflicts, &oracle);

        let results = probe.check_all(candidates(2), date(), time(), None).await;
        let map = by_id(&results);

        assert!(map["v1"].is_confirmed_unavailable());
        assert!(map["v2"].is_confirmed_available());
        assert_eq!(oracle.calls(), vec!["v2".to_string()]);
    }

    #[tokio::test]
    async fn closed_venue_is_full_without_oracle() {
        let conflicts = Reserved::default();
        let oracle = Scripted::default();
        let probe = AvailabilityProbe::new(&conflicts, &oracle);

        let closed = candidate("closed").with_opening_hours(OpeningHours::open_now(false));
        let open = candidate("open").with_opening_hours(OpeningHours::open_now(true));
        let unknown = candidate("unknown").with_opening_hours(OpeningHours::default());

        let results = probe
            .check_all(vec![closed, open, unknown], date(), time(), None)
            .await;
        let map = by_id(&results);

        assert!(map["closed"].is_confirmed_unavailable());
        assert!(map["open"].is_confirmed_available());
        assert!(map["unknown"].is_confirmed_available());
        assert!(!oracle.calls().contains(&"closed".to_string()));
    }

    #[tokio::test]
    async fn progress_events_bracket_each_probe() {
        let conflicts = Reserved::default();
        let oracle = Scripted::default()
            .answer("v2", Ok(false))
            .answer("v3", Err("boom"));
        let probe = AvailabilityProbe::new(&conflicts, &oracle);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        probe
            .check_all(candidates(3), date(), time(), Some(&tx))
            .await;
        drop(tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(events.len(), 6);
        let checking = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Checking { .. }))
            .count();
        assert_eq!(checking, 3);
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::Resolved { candidate, available: true } if candidate.place_id.as_str() == "v1"
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::Resolved { candidate, available: false } if candidate.place_id.as_str() == "v2"
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::Failed { candidate, .. } if candidate.place_id.as_str() == "v3"
        )));
    }

    #[tokio::test]
    async fn probes_run_concurrently() {
        let conflicts = Reserved::default();
        let oracle = Scripted {
            delay: Some(Duration::from_millis(100)),
            ..Default::default()
        };
        let probe = AvailabilityProbe::new(&conflicts, &oracle);

        let started = std::time::Instant::now();
        let results = probe.check_all(candidates(10), date(), time(), None).await;

        assert_eq!(results.len(), 10);
        // Sequential probing would take a full second
        assert!(started.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test]
    async fn slow_probe_times_out() {
        let conflicts = Reserved::default();
        let oracle = Scripted {
            delay: Some(Duration::from_millis(200)),
            ..Default::default()
        };
        let probe =
            AvailabilityProbe::new(&conflicts, &oracle).with_timeout(Duration::from_millis(20));

        let results = probe.check_all(candidates(2), date(), time(), None).await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.checked));
        assert!(
            results
                .iter()
                .all(|r| r.error.as_deref() == Some("availability check timed out after 20 ms"))
        );
    }

    #[tokio::test]
    async fn stop_returns_partial_results() {
        let conflicts = Reserved::default();
        let oracle = Scripted {
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let probe = AvailabilityProbe::new(&conflicts, &oracle);

        let results = probe
            .check_until(
                candidates(3),
                date(),
                time(),
                None,
                tokio::time::sleep(Duration::from_millis(20)),
            )
            .await;

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn empty_input() {
        let conflicts = Reserved::default();
        let oracle = Scripted::default();
        let probe = AvailabilityProbe::new(&conflicts, &oracle);

        assert!(probe.check_all(vec![], date(), time(), None).await.is_empty());
    }

    #[test]
    fn partition_filters() {
        let results = vec![
            ProbeResult::concluded(candidate("a"), true),
            ProbeResult::concluded(candidate("b"), false),
            ProbeResult::failed(candidate("c"), "boom"),
        ];

        let available = available_of(&results);
        let unavailable = unavailable_of(&results);

        assert_eq!(available.len(), 1);
        assert_eq!(available[0].place_id().as_str(), "a");
        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].place_id().as_str(), "b");
    }
}
