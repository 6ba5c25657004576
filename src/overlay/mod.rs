//! Overlay Presentation Layer
//!
//! Holds the graphics drawn on top of the displayed image and paints them
//! through the current image-to-view transform. All mutation happens on the
//! thread that owns the overlay; recognition results reach it over a channel.

pub mod graphic;
pub mod surface;
pub mod transform;
pub mod widgets;

pub use graphic::TextGraphic;
pub use surface::{ImageSurface, RecordingSurface, Surface};
pub use transform::{Alignment, FitTransform, Transform, ViewRect};
pub use widgets::GraphicStyle;

use tracing::trace;

/// Something that can paint itself on the overlay
///
/// Graphics keep their geometry in image space and receive the overlay's
/// current transform on every paint, so they never hold a stale view rect.
pub trait Graphic {
    fn draw(&self, transform: &Transform, surface: &mut dyn Surface);
}

/// Ordered collection of graphics plus the transform they are painted with
pub struct GraphicOverlay {
    graphics: Vec<Box<dyn Graphic>>,
    transform: Transform,
    redraw_requested: bool,
}

impl Default for GraphicOverlay {
    fn default() -> Self {
        Self::new(Transform::identity())
    }
}

impl GraphicOverlay {
    /// Create an empty overlay painting with `transform`
    pub fn new(transform: Transform) -> Self {
        Self {
            graphics: Vec::new(),
            transform,
            redraw_requested: false,
        }
    }

    /// Remove all graphics
    pub fn clear(&mut self) {
        self.graphics.clear();
    }

    /// Append a graphic; callers request a redraw once the batch is complete
    pub fn add(&mut self, graphic: Box<dyn Graphic>) {
        self.graphics.push(graphic);
    }

    pub fn len(&self) -> usize {
        self.graphics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Graphics in insertion (paint) order
    pub fn iter(&self) -> std::slice::Iter<'_, Box<dyn Graphic>> {
        self.graphics.iter()
    }

    /// Replace the transform (e.g. after the bitmap was rescaled)
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.request_redraw();
    }

    /// Mark the overlay as needing a repaint
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Consume a pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Paint every graphic in insertion order
    pub fn draw(&self, surface: &mut dyn Surface) {
        trace!("Painting {} graphics", self.graphics.len());
        for graphic in self.iter() {
            graphic.draw(&self.transform, surface);
        }
    }
}
