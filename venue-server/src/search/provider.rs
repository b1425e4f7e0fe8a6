//! Candidate provider abstraction.
//!
//! The search asks a provider for venues; how the provider finds them
//! (directory API, fixtures, cache) is not its concern.

use std::future::Future;

use crate::domain::Candidate;

/// Filter hints passed to a provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    /// Exclude venues rated below this.
    pub min_rating: Option<f64>,

    /// Maximum venues to return.
    pub limit: Option<usize>,

    /// Continue a previous search from this page.
    pub page_token: Option<String>,
}

impl SearchFilters {
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }
}

/// One page of provider results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePage {
    pub results: Vec<Candidate>,

    /// Present when more results can be fetched.
    pub next_page_token: Option<String>,
}

impl CandidatePage {
    pub fn new(results: Vec<Candidate>) -> Self {
        Self {
            results,
            next_page_token: None,
        }
    }

    pub fn with_next_page(mut self, token: impl Into<String>) -> Self {
        self.next_page_token = Some(token.into());
        self
    }
}

/// Error from a candidate provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be completed
    #[error("venue lookup failed: {0}")]
    Request(String),

    /// The provider asked us to slow down
    #[error("venue lookup rate limited")]
    RateLimited,

    /// The provider answered with something we could not use
    #[error("invalid venue lookup response: {0}")]
    InvalidResponse(String),
}

/// Source of venue candidates.
///
/// This abstraction allows the search to be tested with scripted data.
pub trait CandidateProvider {
    /// Find venues for `sport` near `location`.
    fn search(
        &self,
        sport: &str,
        location: &str,
        filters: &SearchFilters,
    ) -> impl Future<Output = Result<CandidatePage, ProviderError>> + Send;
}
