//! Places API response DTOs.
//!
//! These types map directly to the text search JSON response. Fields are
//! `Option` wherever the API omits them for some places.

use serde::{Deserialize, Serialize};

/// Response from `place/textsearch/json`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextSearchResponse {
    /// API status: "OK", "ZERO_RESULTS", "OVER_QUERY_LIMIT", "REQUEST_DENIED",
    /// "INVALID_REQUEST" or "UNKNOWN_ERROR".
    pub status: String,

    #[serde(default)]
    pub results: Vec<PlaceResult>,

    /// Token for the next page. Only usable after a short delay.
    pub next_page_token: Option<String>,

    /// Explanation accompanying a non-OK status.
    pub error_message: Option<String>,
}

/// A place in search results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaceResult {
    pub place_id: String,

    pub name: String,

    pub formatted_address: Option<String>,

    /// Short address, used when `formatted_address` is missing.
    pub vicinity: Option<String>,

    pub rating: Option<f64>,

    pub user_ratings_total: Option<u32>,

    pub geometry: Option<Geometry>,

    pub opening_hours: Option<PlaceOpeningHours>,

    #[serde(default)]
    pub photos: Vec<Photo>,

    pub price_level: Option<u8>,

    #[serde(default)]
    pub types: Vec<String>,

    /// "OPERATIONAL", "CLOSED_TEMPORARILY" or "CLOSED_PERMANENTLY".
    pub business_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaceOpeningHours {
    pub open_now: Option<bool>,

    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Photo {
    pub photo_reference: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
