//! Message types passed between recognition workers and the viewer

use std::fmt;

use crate::vision::{RecognitionError, TextResult};

/// Identifier of one recognition request, increasing per submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sent from a recognition worker when its request completes
#[derive(Debug)]
pub struct RecognitionEvent {
    /// Request this result belongs to
    pub request: RequestId,
    /// Recognized text or the failure reason
    pub outcome: Result<TextResult, RecognitionError>,
}

/// User-facing notifications raised by the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Recognition succeeded and this many elements are shown
    TextFound { elements: usize },
    /// Recognition succeeded but found nothing
    NoTextFound,
    /// Recognition failed; the overlay was left unchanged
    RecognitionFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::TextFound { elements } => write!(f, "Found {} text elements", elements),
            Notice::NoTextFound => write!(f, "No text found"),
            Notice::RecognitionFailed(reason) => write!(f, "Text recognition failed: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::NoTextFound.to_string(), "No text found");
        assert_eq!(Notice::TextFound { elements: 3 }.to_string(), "Found 3 text elements");
        assert_eq!(
            Notice::RecognitionFailed("boom".to_string()).to_string(),
            "Text recognition failed: boom"
        );
    }

    #[test]
    fn test_request_ids_order() {
        assert!(RequestId(2) > RequestId(1));
        assert_eq!(RequestId(7).to_string(), "#7");
    }
}
