//! Venue search with automatic alternatives.
//!
//! Answers: "which venues can I book for this sport, here, at this time?"
//! When the first few candidates are all taken, the search keeps looking
//! with a progressively lower rating floor.

mod config;
mod controller;
mod provider;

pub use config::SearchConfig;
pub use controller::{AlternativeSearch, SearchError, SearchOutcome, SearchStatus};
pub use provider::{CandidatePage, CandidateProvider, ProviderError, SearchFilters};
