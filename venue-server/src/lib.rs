//! Venue search server.
//!
//! Finds sports venues that are free at a requested date and time, widening
//! the search when none are, and ranks what it finds by rating, distance,
//! availability and popularity.

pub mod availability;
pub mod cache;
pub mod config;
pub mod domain;
pub mod geo;
pub mod places;
pub mod ranking;
pub mod reservations;
pub mod search;
pub mod web;
