//! Fixture-backed recognizer
//!
//! Serves pre-computed recognition output stored as JSON. Boxes are authored
//! against the fixture's `image_width` x `image_height` and rescaled to the
//! bitmap being recognized, so the same fixture works for the source image
//! and any scaled copy of it.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::{RecognitionError, TextRecognizer, TextResult};
use crate::source::frame::Bitmap;

/// On-disk fixture format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionFixture {
    /// Width of the image the boxes were measured on
    pub image_width: u32,
    /// Height of the image the boxes were measured on
    pub image_height: u32,
    /// Recognition output
    #[serde(flatten)]
    pub result: TextResult,
    /// Simulated failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Simulated processing latency
    #[serde(default)]
    pub delay_ms: u64,
}

/// Recognizer that replays a [`RecognitionFixture`]
pub struct FixtureRecognizer {
    path: Option<PathBuf>,
    cached: RwLock<Option<Arc<RecognitionFixture>>>,
}

impl FixtureRecognizer {
    /// Lazily load the fixture from `path` on first use
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            cached: RwLock::new(None),
        }
    }

    /// Serve an in-memory fixture
    #[cfg(test)]
    pub fn from_fixture(fixture: RecognitionFixture) -> Self {
        Self {
            path: None,
            cached: RwLock::new(Some(Arc::new(fixture))),
        }
    }

    fn fixture(&self) -> Result<Arc<RecognitionFixture>, RecognitionError> {
        if let Some(fixture) = self.cached.read().as_ref() {
            return Ok(fixture.clone());
        }

        let mut cached = self.cached.write();
        if let Some(fixture) = cached.as_ref() {
            return Ok(fixture.clone());
        }

        let path = self
            .path
            .as_deref()
            .ok_or_else(|| RecognitionError::Failed("no fixture configured".to_string()))?;
        let fixture = Arc::new(load_fixture(path)?);
        info!(
            "Loaded recognition fixture {:?} ({} elements)",
            path,
            fixture.result.element_count()
        );
        *cached = Some(fixture.clone());
        Ok(fixture)
    }
}

impl TextRecognizer for FixtureRecognizer {
    fn name(&self) -> &str {
        "fixture"
    }

    fn recognize(&self, image: &Bitmap) -> Result<TextResult, RecognitionError> {
        let fixture = self.fixture()?;

        if fixture.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(fixture.delay_ms));
        }

        if let Some(message) = &fixture.error {
            return Err(RecognitionError::Failed(message.clone()));
        }

        if fixture.image_width == 0 || fixture.image_height == 0 {
            return Err(RecognitionError::Failed(format!(
                "fixture has invalid reference size {}x{}",
                fixture.image_width, fixture.image_height
            )));
        }

        let sx = image.width() as f32 / fixture.image_width as f32;
        let sy = image.height() as f32 / fixture.image_height as f32;
        debug!(
            "Fixture rescale {}x{} -> {}x{}",
            fixture.image_width,
            fixture.image_height,
            image.width(),
            image.height()
        );

        let mut result = fixture.result.clone();
        for block in &mut result.blocks {
            for line in &mut block.lines {
                for element in &mut line.elements {
                    element.bounding_box = element.bounding_box.scaled(sx, sy);
                }
            }
        }
        Ok(result)
    }
}

/// Read a fixture file
pub fn load_fixture(path: &Path) -> Result<RecognitionFixture, RecognitionError> {
    let content = std::fs::read_to_string(path)?;
    let fixture = serde_json::from_str(&content)?;
    Ok(fixture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::BoundingBox;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = r#"{
        "image_width": 1000,
        "image_height": 2000,
        "blocks": [
            {
                "text": "Hello world",
                "lines": [
                    {
                        "text": "Hello world",
                        "elements": [
                            { "text": "Hello", "bounding_box": { "left": 40, "top": 80, "right": 400, "bottom": 160 } },
                            { "text": "world", "bounding_box": { "left": 440, "top": 80, "right": 800, "bottom": 160 } }
                        ]
                    }
                ]
            }
        ]
    }"#;

    fn write_fixture(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_recognize_at_reference_size() {
        let file = write_fixture(FIXTURE);
        let recognizer = FixtureRecognizer::from_path(file.path());

        let result = recognizer.recognize(&Bitmap::filled(1000, 2000, [0; 4])).unwrap();

        assert_eq!(result.element_count(), 2);
        let first = result.elements().next().unwrap();
        assert_eq!(first.text, "Hello");
        assert_eq!(first.bounding_box, BoundingBox::new(40, 80, 400, 160));
    }

    #[test]
    fn test_recognize_rescales_to_input() {
        let file = write_fixture(FIXTURE);
        let recognizer = FixtureRecognizer::from_path(file.path());

        let result = recognizer.recognize(&Bitmap::filled(250, 500, [0; 4])).unwrap();

        let boxes: Vec<BoundingBox> = result.elements().map(|e| e.bounding_box).collect();
        assert_eq!(
            boxes,
            vec![BoundingBox::new(10, 20, 100, 40), BoundingBox::new(110, 20, 200, 40)]
        );
    }

    #[test]
    fn test_fixture_error_is_reported() {
        let recognizer = FixtureRecognizer::from_fixture(RecognitionFixture {
            image_width: 10,
            image_height: 10,
            error: Some("model unavailable".to_string()),
            ..Default::default()
        });

        let err = recognizer.recognize(&Bitmap::filled(10, 10, [0; 4])).unwrap_err();
        assert!(matches!(err, RecognitionError::Failed(ref m) if m == "model unavailable"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let file = write_fixture("{ not json");
        let recognizer = FixtureRecognizer::from_path(file.path());

        let err = recognizer.recognize(&Bitmap::filled(1, 1, [0; 4])).unwrap_err();
        assert!(matches!(err, RecognitionError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let recognizer = FixtureRecognizer::from_path("/nonexistent/fixture.json");
        let err = recognizer.recognize(&Bitmap::filled(1, 1, [0; 4])).unwrap_err();
        assert!(matches!(err, RecognitionError::Io(_)));
    }

    #[test]
    fn test_fixture_is_cached_after_first_load() {
        let file = write_fixture(FIXTURE);
        let path = file.path().to_path_buf();
        let recognizer = FixtureRecognizer::from_path(&path);

        recognizer.recognize(&Bitmap::filled(1000, 2000, [0; 4])).unwrap();
        drop(file);
        assert!(!path.exists());

        let result = recognizer.recognize(&Bitmap::filled(1000, 2000, [0; 4])).unwrap();
        assert_eq!(result.element_count(), 2);
    }

    #[test]
    fn test_empty_fixture() {
        let recognizer = FixtureRecognizer::from_fixture(RecognitionFixture {
            image_width: 10,
            image_height: 10,
            ..Default::default()
        });
        let result = recognizer.recognize(&Bitmap::filled(5, 5, [0; 4])).unwrap();
        assert!(result.is_empty());
    }
}
