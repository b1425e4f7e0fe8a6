//! Places text search HTTP client.
//!
//! Provides async access to the text search endpoint. Handles the API key,
//! request concurrency, status checking and conversion to candidates.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::search::{CandidatePage, CandidateProvider, ProviderError, SearchFilters};

use super::convert::{apply_filters, convert_response};
use super::error::PlacesError;
use super::types::TextSearchResponse;

/// Default base URL for the Places API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Language for venue names and addresses.
const DEFAULT_LANGUAGE: &str = "id";

/// Configuration for the Places client.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Response language
    pub language: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PlacesConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Places API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    language: String,
    semaphore: Arc<Semaphore>,
}

impl PlacesClient {
    /// Create a new Places client with the given configuration.
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        if config.api_key.trim().is_empty() {
            return Err(PlacesError::NotConfigured("empty API key".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            language: config.language,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Run a text search, returning the raw response.
    ///
    /// Pass the `next_page_token` of a previous response as `page_token` to
    /// continue it. The API rejects tokens used too soon after they were
    /// issued, so callers should pace page requests.
    pub async fn text_search(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<TextSearchResponse, PlacesError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| PlacesError::NotConfigured("request semaphore closed".to_string()))?;

        let url = format!("{}/place/textsearch/json", self.base_url);

        let mut params = vec![
            ("query", query.to_string()),
            ("language", self.language.clone()),
            ("key", self.api_key.clone()),
        ];
        if let Some(token) = page_token {
            params.push(("pagetoken", token.to_string()));
        }

        debug!(query, paged = page_token.is_some(), "places text search");

        let response = self.http.get(&url).query(&params).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(PlacesError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PlacesError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlacesError::HttpStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: TextSearchResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        check_api_status(&parsed)?;
        Ok(parsed)
    }

    /// URL for a venue photo.
    ///
    /// The URL embeds the API key, so it must not be exposed to clients that
    /// should not see it.
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        photo_url(&self.base_url, &self.api_key, photo_reference, max_width)
    }
}

impl CandidateProvider for PlacesClient {
    async fn search(
        &self,
        sport: &str,
        location: &str,
        filters: &SearchFilters,
    ) -> Result<CandidatePage, ProviderError> {
        let query = format!("{sport} {location}");
        let response = self
            .text_search(&query, filters.page_token.as_deref())
            .await?;

        let fetched = response.results.len();
        let results = apply_filters(convert_response(&response), filters);
        debug!(query = %query, fetched, kept = results.len(), "places page filtered");

        Ok(CandidatePage {
            results,
            next_page_token: response.next_page_token,
        })
    }
}

/// Accept `OK` and `ZERO_RESULTS`; map every other API status to an error.
pub(crate) fn check_api_status(response: &TextSearchResponse) -> Result<(), PlacesError> {
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(PlacesError::RateLimited),
        "REQUEST_DENIED" => {
            warn!(
                message = response.error_message.as_deref().unwrap_or(""),
                "places request denied"
            );
            Err(PlacesError::Unauthorized)
        }
        other => Err(PlacesError::ApiStatus {
            status: other.to_string(),
            message: response.error_message.clone(),
        }),
    }
}

fn photo_url(base_url: &str, api_key: &str, photo_reference: &str, max_width: u32) -> String {
    format!(
        "{base_url}/place/photo?maxwidth={max_width}&photo_reference={photo_reference}&key={api_key}"
    )
}
