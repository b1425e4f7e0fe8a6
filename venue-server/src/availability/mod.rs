//! Availability probing.
//!
//! A venue is unavailable if the slot is already reserved or the directory
//! says it is closed; otherwise the availability oracle decides. Probes for
//! different venues run concurrently and fail independently.

mod oracle;
mod probe;
mod progress;

pub use oracle::{AvailabilityOracle, ConflictChecker, HashedOracle, ProbeError};
pub use probe::{AvailabilityProbe, available_of, unavailable_of};
pub use progress::{ProgressError, ProgressEvent, ProgressSink, TracingSink};

pub(crate) use progress::notify;
