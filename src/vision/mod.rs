//! Text recognition boundary
//!
//! Result model and recognizer trait for the external text-recognition
//! service. Recognition itself is supplied by an implementation of
//! [`TextRecognizer`]; this crate only consumes its results.
//! Backends:
//! - Fixture results loaded from JSON (pre-computed recognition output)

pub mod fixture;
pub mod service;

pub use fixture::FixtureRecognizer;
pub use service::RecognitionService;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::frame::Bitmap;

/// Axis-aligned rectangle in image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Rescale by independent x/y factors, rounding to whole pixels
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self::new(
            (self.left as f32 * sx).round() as i32,
            (self.top as f32 * sy).round() as i32,
            (self.right as f32 * sx).round() as i32,
            (self.bottom as f32 * sy).round() as i32,
        )
    }
}

/// Smallest recognized unit, typically a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
    pub bounding_box: BoundingBox,
}

/// A line of recognized elements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextLine {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub elements: Vec<TextElement>,
}

/// A block (paragraph) of recognized lines
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

/// Full recognition output for one image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextResult {
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl TextResult {
    /// All elements in block, line, element order
    pub fn elements(&self) -> impl Iterator<Item = &TextElement> {
        self.blocks
            .iter()
            .flat_map(|block| block.lines.iter())
            .flat_map(|line| line.elements.iter())
    }

    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// True when nothing was recognized
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }
}

/// Errors reported by a recognizer or the recognition service
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("failed to read recognition data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse recognition data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("recognition failed: {0}")]
    Failed(String),
    #[error("recognition worker exited without a result")]
    WorkerLost,
}

/// External text-recognition collaborator
///
/// Bounding boxes in the returned result are expressed in the pixel space
/// of the `image` argument.
pub trait TextRecognizer: Send + Sync {
    /// Short backend name for logging
    fn name(&self) -> &str;

    /// Recognize text in an image
    fn recognize(&self, image: &Bitmap) -> Result<TextResult, RecognitionError>;
}
