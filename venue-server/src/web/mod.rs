//! Web layer for the venue search service.
//!
//! Provides HTTP endpoints for searching venues and managing reservations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, VenueDirectory};
