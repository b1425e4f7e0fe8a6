//! Mock Places provider for development without API access.
//!
//! Loads sample text search responses from JSON files and serves them as if
//! they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::search::{CandidatePage, CandidateProvider, ProviderError, SearchFilters};

use super::client::check_api_status;
use super::convert::{apply_filters, convert_response};
use super::error::PlacesError;
use super::types::TextSearchResponse;

/// Provider that serves venues from JSON fixtures.
///
/// Expects files named `{sport}.json` (e.g. `futsal.json`). The location is
/// ignored and every fixture is a single page.
#[derive(Debug, Clone)]
pub struct MockPlacesProvider {
    responses: Arc<HashMap<String, TextSearchResponse>>,
}

impl MockPlacesProvider {
    /// Load every fixture in `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, PlacesError> {
        let data_dir = data_dir.as_ref();
        let mut responses = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            PlacesError::NotConfigured(format!(
                "failed to read mock data directory {data_dir:?}: {e}"
            ))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                PlacesError::NotConfigured(format!("failed to read directory entry: {e}"))
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let sport = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(normalise_sport)
                .ok_or_else(|| PlacesError::NotConfigured(format!("invalid filename: {path:?}")))?;

            let json = std::fs::read_to_string(&path).map_err(|e| {
                PlacesError::NotConfigured(format!("failed to read {path:?}: {e}"))
            })?;

            let response: TextSearchResponse =
                serde_json::from_str(&json).map_err(|e| PlacesError::Json {
                    message: format!("{path:?}: {e}"),
                    body: None,
                })?;
            check_api_status(&response)?;

            responses.insert(sport, response);
        }

        if responses.is_empty() {
            return Err(PlacesError::NotConfigured(format!(
                "no mock venue files found in {data_dir:?}"
            )));
        }

        Ok(Self {
            responses: Arc::new(responses),
        })
    }

    /// Sports with fixtures, sorted.
    pub fn sports(&self) -> Vec<&str> {
        let mut sports: Vec<&str> = self.responses.keys().map(String::as_str).collect();
        sports.sort_unstable();
        sports
    }
}

impl CandidateProvider for MockPlacesProvider {
    async fn search(
        &self,
        sport: &str,
        location: &str,
        filters: &SearchFilters,
    ) -> Result<CandidatePage, ProviderError> {
        // Fixtures are a single page, so a continuation has nothing more.
        if filters.page_token.is_some() {
            return Ok(CandidatePage::default());
        }

        let Some(response) = self.responses.get(&normalise_sport(sport)) else {
            debug!(sport, location, "no mock venues for sport");
            return Ok(CandidatePage::default());
        };

        Ok(CandidatePage::new(apply_filters(
            convert_response(response),
            filters,
        )))
    }
}

fn normalise_sport(sport: &str) -> String {
    sport.trim().to_lowercase()
}
