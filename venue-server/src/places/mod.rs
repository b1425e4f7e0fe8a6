//! Places directory client.
//!
//! This module provides an HTTP client for a Places-style text search API,
//! which is the source of venue candidates.
//!
//! Key characteristics of the API:
//! - Searches are free text (`"{sport} {location}"`)
//! - Results come in pages of up to 20; a `next_page_token` only becomes
//!   valid a couple of seconds after it is issued
//! - Status is reported in the body, not only via HTTP status codes

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{PlacesClient, PlacesConfig};
pub use convert::{
    ConversionError, DEFAULT_MIN_RATING, apply_filters, convert_place, convert_response,
    popularity,
};
pub use error::PlacesError;
pub use mock::MockPlacesProvider;
pub use types::{Geometry, LatLng, Photo, PlaceOpeningHours, PlaceResult, TextSearchResponse};
