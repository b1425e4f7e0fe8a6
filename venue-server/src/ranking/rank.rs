//! Venue ranking.
//!
//! Venues are ordered by:
//! 1. Score (higher is better)
//! 2. Rating (higher is better, unrated last)
//! 3. Distance from the user (closer is better, unknown last)
//! 4. Input order
//!
//! The sort is stable, so venues equal on every key keep their input order.

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::{Coordinates, Preferences, ProbeResult};

use super::score::{ScoreBreakdown, score_venue};

/// A probed venue with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredVenue {
    pub venue: ProbeResult,

    /// Final score, 0 to 100.
    pub score: u8,

    /// Unmultiplied components behind `score`.
    pub breakdown: ScoreBreakdown,

    /// Distance from the user, when both locations are known.
    pub distance_km: Option<f64>,
}

/// Score and rank venues, best first.
pub fn rank_venues(
    venues: Vec<ProbeResult>,
    user_location: Option<Coordinates>,
    preferences: &Preferences,
) -> Vec<ScoredVenue> {
    let mut scored: Vec<ScoredVenue> = venues
        .into_iter()
        .map(|venue| {
            let s = score_venue(&venue, user_location, preferences);
            ScoredVenue {
                venue,
                score: s.score,
                breakdown: s.breakdown,
                distance_km: s.distance_km,
            }
        })
        .collect();

    scored.sort_by(compare);

    debug!(venues = scored.len(), "venues ranked");
    scored
}

/// The best `n` venues.
pub fn top_recommendations(
    venues: Vec<ProbeResult>,
    user_location: Option<Coordinates>,
    preferences: &Preferences,
    n: usize,
) -> Vec<ScoredVenue> {
    let mut ranked = rank_venues(venues, user_location, preferences);
    ranked.truncate(n);
    ranked
}

fn compare(a: &ScoredVenue, b: &ScoredVenue) -> Ordering {
    // Primary: score, descending
    b.score
        .cmp(&a.score)
        // Secondary: rating, descending
        .then_with(|| compare_option(b.venue.candidate.rating, a.venue.candidate.rating))
        // Tertiary: distance, ascending with unknown last
        .then_with(|| match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Orders `None` below every value.
fn compare_option(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Candidate, PlaceId};
    use proptest::prelude::*;

    fn venue_strategy() -> impl Strategy<Value = (Option<f64>, Option<u32>, bool, Option<(f64, f64)>)> {
        (
            prop::option::of(0.0f64..=5.0),
            prop::option::of(0u32..2000),
            any::<bool>(),
            prop::option::of((-6.5f64..-6.0, 106.6f64..107.0)),
        )
    }

    fn build(params: Vec<(Option<f64>, Option<u32>, bool, Option<(f64, f64)>)>) -> Vec<ProbeResult> {
        params
            .into_iter()
            .enumerate()
            .map(|(i, (rating, reviews, available, location))| {
                let mut c = Candidate::new(PlaceId::parse(&format!("v{i}")).unwrap(), "Venue");
                c.rating = rating;
                c.user_ratings_total = reviews;
                c.location = location.map(|(lat, lng)| Coordinates::new(lat, lng));
                ProbeResult::concluded(c, available)
            })
            .collect()
    }

    fn prefs_strategy() -> impl Strategy<Value = Preferences> {
        (any::<bool>(), any::<bool>()).prop_map(|(prefer_high_rating, prefer_nearby)| Preferences {
            prefer_high_rating,
            prefer_nearby,
        })
    }

    proptest! {
        #[test]
        fn sorted_by_score(
            params in prop::collection::vec(venue_strategy(), 0..20),
            prefs in prefs_strategy(),
        ) {
            let user = Some(Coordinates::new(-6.2, 106.8));
            let ranked = rank_venues(build(params), user, &prefs);

            for window in ranked.windows(2) {
                prop_assert!(window[0].score >= window[1].score);
            }
        }

        #[test]
        fn preserves_elements(params in prop::collection::vec(venue_strategy(), 0..20)) {
            let venues = build(params);
            let n = venues.len();
            let ranked = rank_venues(venues, None, &Preferences::default());
            prop_assert_eq!(ranked.len(), n);
        }

        #[test]
        fn idempotent(
            params in prop::collection::vec(venue_strategy(), 0..20),
            prefs in prefs_strategy(),
        ) {
            let venues = build(params);
            let user = Some(Coordinates::new(-6.2, 106.8));

            let first = rank_venues(venues.clone(), user, &prefs);
            let second = rank_venues(venues, user, &prefs);

            prop_assert_eq!(first, second);
        }

        #[test]
        fn scores_in_range(
            params in prop::collection::vec(venue_strategy(), 0..20),
            prefs in prefs_strategy(),
        ) {
            let ranked = rank_venues(build(params), Some(Coordinates::new(-6.2, 106.8)), &prefs);
            for v in ranked {
                prop_assert!(v.score <= 100);
                prop_assert!(v.breakdown.rating >= 0.0);
                prop_assert!(v.breakdown.distance >= 0.0);
                prop_assert!(v.breakdown.reviews >= 0.0);
            }
        }
    }
}
