//! Off-thread recognition dispatch
//!
//! Each request runs on its own worker thread and reports back over a single
//! channel, which the display thread drains. Requests are never cancelled.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::{RecognitionError, TextRecognizer};
use crate::shared::{RecognitionEvent, RequestId};
use crate::source::frame::Bitmap;

/// Dispatches recognition requests to worker threads
pub struct RecognitionService {
    recognizer: Arc<dyn TextRecognizer>,
    sender: Sender<RecognitionEvent>,
    next_id: u64,
}

impl RecognitionService {
    /// Create a service and the receiver its results arrive on
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> (Self, Receiver<RecognitionEvent>) {
        let (sender, receiver) = unbounded();
        let service = Self {
            recognizer,
            sender,
            next_id: 1,
        };
        (service, receiver)
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Start recognizing `image`; the result is delivered as a [`RecognitionEvent`]
    pub fn submit(&mut self, image: Bitmap) -> RequestId {
        let request = RequestId(self.next_id);
        self.next_id += 1;

        let recognizer = self.recognizer.clone();
        let sender = self.sender.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("recognition-{}", request.0))
            .spawn(move || {
                let started = Instant::now();
                let outcome = recognizer.recognize(&image);
                debug!(
                    "Request {} finished in {:?} (ok: {})",
                    request.0,
                    started.elapsed(),
                    outcome.is_ok()
                );
                // The receiver may already be gone during shutdown
                let _ = sender.send(RecognitionEvent { request, outcome });
            });

        if let Err(e) = spawned {
            warn!("Failed to spawn recognition worker: {}", e);
            let _ = self.sender.send(RecognitionEvent {
                request,
                outcome: Err(RecognitionError::WorkerLost),
            });
        }

        debug!("Submitted recognition request {}", request.0);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::{BoundingBox, TextBlock, TextElement, TextLine, TextResult};
    use std::time::Duration;

    struct EchoSizeRecognizer;

    impl TextRecognizer for EchoSizeRecognizer {
        fn name(&self) -> &str {
            "echo"
        }

        fn recognize(&self, image: &Bitmap) -> Result<TextResult, RecognitionError> {
            if image.width() == 1 {
                return Err(RecognitionError::Failed("too small".to_string()));
            }
            Ok(TextResult {
                blocks: vec![TextBlock {
                    text: String::new(),
                    lines: vec![TextLine {
                        text: String::new(),
                        elements: vec![TextElement {
                            text: "size".to_string(),
                            bounding_box: BoundingBox::new(0, 0, image.width() as i32, image.height() as i32),
                        }],
                    }],
                }],
            })
        }
    }

    #[test]
    fn test_submit_delivers_result() {
        let (mut service, receiver) = RecognitionService::new(Arc::new(EchoSizeRecognizer));
        let request = service.submit(Bitmap::filled(8, 4, [0; 4]));

        let event = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event.request, request);
        let result = event.outcome.unwrap();
        assert_eq!(result.elements().next().unwrap().bounding_box, BoundingBox::new(0, 0, 8, 4));
    }

    #[test]
    fn test_request_ids_increase() {
        let (mut service, receiver) = RecognitionService::new(Arc::new(EchoSizeRecognizer));
        let first = service.submit(Bitmap::filled(2, 2, [0; 4]));
        let second = service.submit(Bitmap::filled(2, 2, [0; 4]));
        assert!(second > first);

        let mut seen = vec![
            receiver.recv_timeout(Duration::from_secs(5)).unwrap().request,
            receiver.recv_timeout(Duration::from_secs(5)).unwrap().request,
        ];
        seen.sort();
        assert_eq!(seen, vec![first, second]);
    }

    #[test]
    fn test_failure_is_delivered() {
        let (mut service, receiver) = RecognitionService::new(Arc::new(EchoSizeRecognizer));
        service.submit(Bitmap::filled(1, 1, [0; 4]));

        let event = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(event.outcome, Err(RecognitionError::Failed(_))));
        assert_eq!(service.recognizer_name(), "echo");
    }
}
