//! Availability search with automatic widening.
//!
//! The controller checks an initial set of candidates. If none is available
//! it makes up to `max_attempts` further provider calls, each with a lower
//! rating floor, and probes only venues it has not seen before. It stops at
//! the first attempt that turns up an available venue.
//!
//! An initial search that finds nothing (or fails) still goes on to widen;
//! a lower rating floor may surface venues the first query filtered out.
//!
//! Attempts run strictly one after another: each one needs to know which
//! venues were already checked. Only this control loop touches the
//! accumulated results; probes hand theirs back as return values.

use std::collections::HashSet;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::availability::{
    AvailabilityOracle, AvailabilityProbe, ConflictChecker, ProgressEvent, ProgressSink, notify,
};
use crate::domain::{Candidate, PlaceId, ProbeResult, QueryError, SearchQuery};

use super::config::SearchConfig;
use super::provider::{CandidateProvider, SearchFilters};

/// Message sent to progress sinks before widening begins.
const NONE_AVAILABLE_MESSAGE: &str = "No venue is free at that time, looking for alternatives";

/// Error from venue search.
///
/// Provider and probe failures never surface here; they degrade into
/// missing or unchecked results.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The query cannot be run
    #[error("invalid search request: {0}")]
    InvalidQuery(#[from] QueryError),
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// At least one venue is available.
    Found,

    /// Every attempt was used (or the search was cut short) without finding
    /// an available venue.
    Exhausted,
}

/// Result of venue search.
///
/// No place id appears twice across `available`, `unavailable` and
/// `errored`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Every available venue found, across all attempts.
    pub available: Vec<ProbeResult>,

    /// Every venue checked and found unavailable.
    pub unavailable: Vec<ProbeResult>,

    /// Venues whose probe failed before concluding.
    pub errored: Vec<ProbeResult>,

    pub status: SearchStatus,

    /// Widening attempts made; 0 if the initial search was enough.
    pub attempts_used: usize,

    /// True if cancellation or the deadline cut the search short.
    pub cancelled: bool,
}

/// Accumulated state of one search invocation.
#[derive(Default)]
struct Accumulator {
    seen: HashSet<PlaceId>,
    available: Vec<ProbeResult>,
    unavailable: Vec<ProbeResult>,
    errored: Vec<ProbeResult>,
}

impl Accumulator {
    /// Keep candidates not seen before, dropping repeats within the batch too.
    fn unseen(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut batch = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| !self.seen.contains(&c.place_id) && batch.insert(c.place_id.clone()))
            .collect()
    }

    /// Record probe results. Returns how many were available.
    fn absorb(&mut self, results: Vec<ProbeResult>) -> usize {
        let mut found = 0;
        for result in results {
            if !self.seen.insert(result.place_id().clone()) {
                continue;
            }
            if result.is_confirmed_available() {
                found += 1;
                self.available.push(result);
            } else if result.checked {
                self.unavailable.push(result);
            } else {
                self.errored.push(result);
            }
        }
        found
    }

    fn finish(self, attempts_used: usize, cancelled: bool) -> SearchOutcome {
        let status = if self.available.is_empty() {
            SearchStatus::Exhausted
        } else {
            SearchStatus::Found
        };

        SearchOutcome {
            available: self.available,
            unavailable: self.unavailable,
            errored: self.errored,
            status,
            attempts_used,
            cancelled,
        }
    }
}

/// Cancellation token plus optional deadline.
struct Cutoff {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Cutoff {
    fn reached(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the search should stop.
    async fn wait(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

/// Venue search with automatic alternatives.
pub struct AlternativeSearch<'a, P, C, O>
where
    P: CandidateProvider,
    C: ConflictChecker,
    O: AvailabilityOracle,
{
    provider: &'a P,
    conflicts: &'a C,
    oracle: &'a O,
    config: &'a SearchConfig,
}

impl<'a, P, C, O> AlternativeSearch<'a, P, C, O>
where
    P: CandidateProvider,
    C: ConflictChecker,
    O: AvailabilityOracle,
{
    /// Create a new search.
    pub fn new(provider: &'a P, conflicts: &'a C, oracle: &'a O, config: &'a SearchConfig) -> Self {
        Self {
            provider,
            conflicts,
            oracle,
            config,
        }
    }

    /// Search for available venues, widening the search if needed.
    pub async fn search_with_auto_alternatives(
        &self,
        query: &SearchQuery,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<SearchOutcome, SearchError> {
        self.search_with_cancel(query, sink, &CancellationToken::new())
            .await
    }

    /// As [`search_with_auto_alternatives`](Self::search_with_auto_alternatives),
    /// returning early with partial results once `cancel` fires or the
    /// configured deadline passes.
    pub async fn search_with_cancel(
        &self,
        query: &SearchQuery,
        sink: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, SearchError> {
        query.validate()?;

        let cutoff = Cutoff {
            token: cancel.clone(),
            deadline: self
                .config
                .deadline()
                .and_then(|d| Instant::now().checked_add(d)),
        };
        let max_attempts = query.max_attempts.unwrap_or(self.config.max_attempts);
        let mut acc = Accumulator::default();

        info!(
            sport = %query.sport,
            location = %query.location,
            date = %query.date,
            time = %query.time,
            "searching venues"
        );

        // Initial search
        let limit = query.limit.unwrap_or(self.config.initial_limit);
        let filters = SearchFilters::default().with_limit(limit);
        let initial = tokio::select! {
            biased;
            _ = cutoff.wait() => return Ok(acc.finish(0, true)),
            page = self.provider.search(&query.sport, &query.location, &filters) => page,
        };
        let initial = match initial {
            Ok(page) => page.results,
            Err(e) => {
                warn!(error = %e, "initial venue lookup failed");
                Vec::new()
            }
        };

        let initial = acc.unseen(initial);
        if initial.is_empty() {
            warn!("no venues found in initial search");
        } else {
            let results = self.probe(initial, query, sink, &cutoff).await;
            if acc.absorb(results) > 0 {
                return Ok(acc.finish(0, cutoff.reached()));
            }
        }

        if cutoff.reached() {
            return Ok(acc.finish(0, true));
        }

        notify(
            sink,
            ProgressEvent::NoneAvailableYet {
                message: NONE_AVAILABLE_MESSAGE.to_string(),
            },
        );

        for attempt in 1..=max_attempts {
            if cutoff.reached() {
                info!(attempt, "search cut short");
                return Ok(acc.finish(attempt - 1, true));
            }

            notify(
                sink,
                ProgressEvent::AttemptStarted {
                    attempt,
                    max_attempts,
                },
            );

            let fetched = self.fetch_alternatives(query, attempt, &cutoff).await;
            let fresh = acc.unseen(fetched);

            if fresh.is_empty() {
                warn!(attempt, "no new venues found");
                continue;
            }

            debug!(attempt, venues = fresh.len(), "checking alternative venues");
            let results = self.probe(fresh, query, sink, &cutoff).await;
            let found = acc.absorb(results);

            if found > 0 {
                info!(attempt, found, "found alternative venues");
                return Ok(acc.finish(attempt, cutoff.reached()));
            }
        }

        let cancelled = cutoff.reached();
        if !cancelled {
            warn!(max_attempts, "no alternative venues found after all attempts");
        }
        Ok(acc.finish(max_attempts, cancelled))
    }

    async fn probe(
        &self,
        candidates: Vec<Candidate>,
        query: &SearchQuery,
        sink: Option<&dyn ProgressSink>,
        cutoff: &Cutoff,
    ) -> Vec<ProbeResult> {
        let mut probe = AvailabilityProbe::new(self.conflicts, self.oracle);
        if let Some(timeout) = self.config.probe_timeout() {
            probe = probe.with_timeout(timeout);
        }

        probe
            .check_until(candidates, query.date, query.time, sink, cutoff.wait())
            .await
    }

    /// Fetch candidates for one widening attempt.
    ///
    /// Drains provider pages while a next-page token is offered, pausing
    /// between pages. A failed fetch contributes whatever was gathered
    /// before it.
    async fn fetch_alternatives(
        &self,
        query: &SearchQuery,
        attempt: usize,
        cutoff: &Cutoff,
    ) -> Vec<Candidate> {
        let limit = query.limit.unwrap_or(self.config.alternative_limit);
        let min_rating = self.config.min_rating_for_attempt(attempt);
        let max_pages = self.config.max_pages.max(1);

        let mut gathered = Vec::new();
        let mut page_token: Option<String> = None;

        for page_number in 0..max_pages {
            if gathered.len() >= limit.saturating_mul(max_pages) {
                break;
            }

            if page_number > 0 {
                tokio::select! {
                    biased;
                    _ = cutoff.wait() => break,
                    _ = tokio::time::sleep(self.config.page_delay()) => {}
                }
            }

            let mut filters = SearchFilters::default()
                .with_min_rating(min_rating)
                .with_limit(limit);
            filters.page_token = page_token.take();

            let page = tokio::select! {
                biased;
                _ = cutoff.wait() => break,
                page = self.provider.search(&query.sport, &query.location, &filters) => page,
            };

            match page {
                Ok(page) => {
                    debug!(
                        attempt,
                        page = page_number + 1,
                        venues = page.results.len(),
                        min_rating,
                        "fetched alternative venues"
                    );
                    if page.results.is_empty() {
                        break;
                    }
                    gathered.extend(page.results);
                    match page.next_page_token {
                        Some(token) => page_token = Some(token),
                        None => break,
                    }
                }
                Err(e) => {
                    warn!(attempt, error = %e, "alternative venue lookup failed");
                    break;
                }
            }
        }

        gathered
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
