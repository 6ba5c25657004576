//! Recognized-text graphic

use crate::overlay::surface::Surface;
use crate::overlay::widgets::GraphicStyle;
use crate::overlay::{Graphic, Transform, ViewRect};
use crate::vision::{BoundingBox, TextElement};

/// Outline (and optional label) around one recognized text element
#[derive(Debug, Clone)]
pub struct TextGraphic {
    bounding_box: BoundingBox,
    text: Option<String>,
    style: GraphicStyle,
}

impl TextGraphic {
    pub fn new(bounding_box: BoundingBox, style: GraphicStyle) -> Self {
        Self {
            bounding_box,
            text: None,
            style,
        }
    }

    /// Graphic for a recognized element, carrying its text as the label
    pub fn from_element(element: &TextElement, style: GraphicStyle) -> Self {
        Self {
            text: Some(element.text.clone()),
            ..Self::new(element.bounding_box, style)
        }
    }

    /// View-space rectangle under `transform`
    pub fn view_rect(&self, transform: &Transform) -> ViewRect {
        transform.map_box(&self.bounding_box)
    }
}

impl Graphic for TextGraphic {
    fn draw(&self, transform: &Transform, surface: &mut dyn Surface) {
        let rect = self.view_rect(transform);
        surface.stroke_rect(rect, self.style.stroke_color, self.style.stroke_width);

        if self.style.draw_labels {
            if let Some(text) = &self.text {
                surface.draw_text(rect.left, rect.bottom, text, self.style.text_color, self.style.text_size);
            }
        }
    }
}
