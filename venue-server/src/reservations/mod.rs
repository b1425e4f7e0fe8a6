//! In-memory reservation store.
//!
//! Reservations move from pending to confirmed or cancelled. Pending and
//! confirmed reservations hold their slot, which is what availability probes
//! check before asking the oracle.

mod error;
mod store;

pub use error::ReservationError;
pub use store::{NewReservation, Reservation, ReservationId, ReservationStatus, ReservationStore};
