//! Progress reporting for long-running searches.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::domain::Candidate;

/// Something that happened during a search.
///
/// Probe events for different candidates arrive in no particular order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A probe for this candidate has started.
    Checking { candidate: Candidate },

    /// A probe concluded.
    Resolved { candidate: Candidate, available: bool },

    /// A probe failed before concluding.
    Failed { candidate: Candidate, error: String },

    /// A widening attempt is starting (1-based).
    AttemptStarted { attempt: usize, max_attempts: usize },

    /// The initial candidates had nothing available; widening is about to begin.
    NoneAvailableYet { message: String },
}

/// Error returned by a sink that could not take an event.
#[derive(Debug, Clone, thiserror::Error)]
#[error("progress sink rejected event: {0}")]
pub struct ProgressError(pub String);

/// Receives progress events.
///
/// Sinks are best-effort: a failing sink is logged and otherwise ignored.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent) -> Result<(), ProgressError>;
}

impl ProgressSink for UnboundedSender<ProgressEvent> {
    fn report(&self, event: ProgressEvent) -> Result<(), ProgressError> {
        self.send(event)
            .map_err(|_| ProgressError("receiver dropped".to_string()))
    }
}

/// Sink that writes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&self, event: ProgressEvent) -> Result<(), ProgressError> {
        match &event {
            ProgressEvent::Checking { candidate } => {
                debug!(place_id = %candidate.place_id, name = %candidate.name, "checking venue");
            }
            ProgressEvent::Resolved {
                candidate,
                available,
            } => {
                debug!(
                    place_id = %candidate.place_id,
                    name = %candidate.name,
                    available,
                    "venue checked"
                );
            }
            ProgressEvent::Failed { candidate, error } => {
                debug!(place_id = %candidate.place_id, error = %error, "venue check failed");
            }
            ProgressEvent::AttemptStarted {
                attempt,
                max_attempts,
            } => {
                info!(attempt, max_attempts, "searching for alternatives");
            }
            ProgressEvent::NoneAvailableYet { message } => {
                info!(%message, "no venue available yet");
            }
        }
        Ok(())
    }
}

/// Deliver an event if a sink is attached, logging sink failures.
pub(crate) fn notify(sink: Option<&dyn ProgressSink>, event: ProgressEvent) {
    let Some(sink) = sink else {
        return;
    };

    if let Err(e) = sink.report(event) {
        warn!(error = %e, "progress sink failed, continuing");
    }
}
