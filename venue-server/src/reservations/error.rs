//! Reservation store error types.

use super::{ReservationId, ReservationStatus};

/// Errors from reservation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReservationError {
    /// No reservation has this ID
    #[error("reservation {0} not found")]
    NotFound(ReservationId),

    /// Another active reservation already holds the slot
    #[error("slot already reserved by reservation {0}")]
    SlotTaken(ReservationId),

    /// The requested status change is not allowed
    #[error("cannot {action} a {from} reservation")]
    InvalidTransition {
        from: ReservationStatus,
        action: &'static str,
    },

    /// Booking details were missing or malformed
    #[error("invalid reservation: {0}")]
    Invalid(String),
}
