//! Venue scoring and ranking.
//!
//! Scores combine rating, distance, availability and review volume into a
//! 0 to 100 value. Ranking orders venues best-first with deterministic
//! tie-breaks.

mod rank;
mod score;

pub use rank::{ScoredVenue, rank_venues, top_recommendations};
pub use score::{
    NEUTRAL_DISTANCE, ScoreBreakdown, VenueScore, availability_score, distance_component,
    rating_score, reviews_score, score_venue,
};
