//! Paint styles for overlay graphics

use serde::{Deserialize, Serialize};

/// Style used when painting a recognized-text graphic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicStyle {
    /// Rectangle stroke color (RGBA)
    pub stroke_color: [u8; 4],
    /// Stroke width in view pixels
    pub stroke_width: f32,
    /// Label color (RGBA)
    pub text_color: [u8; 4],
    /// Label size in view pixels
    pub text_size: f32,
    /// Draw the recognized text under each box
    pub draw_labels: bool,
}

impl Default for GraphicStyle {
    fn default() -> Self {
        Self {
            stroke_color: [255, 0, 0, 255],
            stroke_width: 4.0,
            text_color: [255, 0, 0, 255],
            text_size: 54.0,
            draw_labels: false,
        }
    }
}
