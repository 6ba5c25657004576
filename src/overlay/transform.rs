//! Image-to-view coordinate transforms
//!
//! Computes the uniform scale that fits an image inside a viewport and maps
//! image-space boxes into view space.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vision::BoundingBox;

/// Errors raised while computing a transform
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// One of the input dimensions was zero
    #[error("invalid {name}: {value} (dimensions must be positive)")]
    InvalidDimension { name: &'static str, value: u32 },
    /// The scale factor was zero, negative or not finite
    #[error("invalid scale factor: {0}")]
    InvalidScale(f32),
}

/// Where the scaled image sits inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Anchor the image at the viewport origin (no offset)
    #[default]
    TopLeft,
    /// Centre the image, letterboxing the leftover space
    Center,
}

/// Rectangle in view (surface) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ViewRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

/// Uniform scale plus offset, mapping `v` to `v * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a transform; the scale must be finite and positive
    pub fn new(scale: f32, offset_x: f32, offset_y: f32) -> Result<Self, TransformError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TransformError::InvalidScale(scale));
        }
        Ok(Self { scale, offset_x, offset_y })
    }

    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Offset as (x, y)
    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    /// Map a single image-space point into view space
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    /// Map an image-space bounding box into view space
    pub fn map_box(&self, bounds: &BoundingBox) -> ViewRect {
        let (left, top) = self.map_point(bounds.left as f32, bounds.top as f32);
        let (right, bottom) = self.map_point(bounds.right as f32, bounds.bottom as f32);
        ViewRect::new(left, top, right, bottom)
    }
}

/// Result of fitting an image into a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    /// Shrink factor: source pixels per displayed pixel
    pub scale: f32,
    /// Width of the scaled image in pixels
    pub scaled_width: u32,
    /// Height of the scaled image in pixels
    pub scaled_height: u32,
    /// Horizontal position of the scaled image inside the viewport
    pub offset_x: f32,
    /// Vertical position of the scaled image inside the viewport
    pub offset_y: f32,
}

impl FitTransform {
    /// Transform for boxes measured on the scaled (displayed) bitmap
    pub fn displayed_to_view(&self) -> Result<Transform, TransformError> {
        Transform::new(1.0, self.offset_x, self.offset_y)
    }

    /// Transform for boxes measured on the original, unscaled bitmap
    pub fn source_to_view(&self) -> Result<Transform, TransformError> {
        Transform::new(1.0 / self.scale, self.offset_x, self.offset_y)
    }
}

/// Compute the top-left aligned fit of an image inside a viewport
///
/// `scale = max(iw / vw, ih / vh)`, so the most constraining axis decides how
/// far the image is shrunk; the scaled size is `round(iw / scale)` by
/// `round(ih / scale)`.
pub fn compute_fit_transform(
    image_width: u32,
    image_height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> Result<FitTransform, TransformError> {
    for (name, value) in [
        ("image width", image_width),
        ("image height", image_height),
        ("viewport width", viewport_width),
        ("viewport height", viewport_height),
    ] {
        if value == 0 {
            return Err(TransformError::InvalidDimension { name, value });
        }
    }

    let scale = (image_width as f32 / viewport_width as f32)
        .max(image_height as f32 / viewport_height as f32);

    let scaled_width = ((image_width as f32 / scale).round() as u32).clamp(1, viewport_width);
    let scaled_height = ((image_height as f32 / scale).round() as u32).clamp(1, viewport_height);

    Ok(FitTransform {
        scale,
        scaled_width,
        scaled_height,
        offset_x: 0.0,
        offset_y: 0.0,
    })
}

/// Same as [`compute_fit_transform`] with a configurable alignment
pub fn compute_fit_transform_aligned(
    image_width: u32,
    image_height: u32,
    viewport_width: u32,
    viewport_height: u32,
    alignment: Alignment,
) -> Result<FitTransform, TransformError> {
    let mut fit = compute_fit_transform(image_width, image_height, viewport_width, viewport_height)?;

    if alignment == Alignment::Center {
        fit.offset_x = ((viewport_width - fit.scaled_width) / 2) as f32;
        fit.offset_y = ((viewport_height - fit.scaled_height) / 2) as f32;
    }

    Ok(fit)
}
