//! Runtime state of the viewer (not persisted)

use crate::shared::messages::{Notice, RequestId};

/// Runtime state that is not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Most recent request; only its result may update the overlay
    pub latest_request: Option<RequestId>,
    /// Most recent request whose result has been applied
    pub applied_request: Option<RequestId>,
    /// Requests submitted but not yet answered
    pub in_flight: usize,
    /// Results discarded because a newer request was pending
    pub stale_results: usize,
    /// Number of graphics currently displayed
    pub elements_displayed: usize,
    /// Last notice shown to the user
    pub last_notice: Option<Notice>,
    /// Last error message (if any)
    pub last_error: Option<String>,
}

impl RuntimeState {
    /// Whether any request is still outstanding
    pub fn is_recognizing(&self) -> bool {
        self.in_flight > 0
    }

    /// Whether the latest request has already been answered
    pub fn latest_applied(&self) -> bool {
        self.latest_request.is_some() && self.applied_request == self.latest_request
    }

    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }
}
