//! Domain types for venue search.
//!
//! Identifiers enforce their invariants at construction time. Candidates and
//! probe results are plain values: later pipeline stages wrap them in new
//! values instead of mutating them.

mod error;
mod place_id;
mod probe;
mod query;
mod venue;

pub use error::QueryError;
pub use place_id::{InvalidPlaceId, PlaceId};
pub use probe::ProbeResult;
pub use query::{MAX_ATTEMPTS, MAX_LIMIT, Preferences, SearchQuery};
pub use venue::{Candidate, Coordinates, OpeningHours};
