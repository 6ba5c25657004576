//! Display surfaces the overlay paints onto
//!
//! [`ImageSurface`] rasterizes onto an RGBA canvas; [`RecordingSurface`]
//! keeps the issued draw calls so they can be inspected or exported.

use ab_glyph::{FontArc, PxScale};
use anyhow::{Context, Result};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use serde::Serialize;
use std::path::Path;
use tracing::trace;

use crate::overlay::ViewRect;
use crate::source::frame::Bitmap;

/// Largest label origin coordinate handed to imageproc
const LABEL_REACH: f32 = 1.0e6;

/// Load a TrueType/OpenType font used to rasterize labels
pub fn load_font(path: &Path) -> Result<FontArc> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read font {:?}", path))?;
    FontArc::try_from_vec(data).with_context(|| format!("Invalid font file {:?}", path))
}

/// Abstract 2D paint target
pub trait Surface {
    /// Surface size as (width, height) in view pixels
    fn size(&self) -> (u32, u32);

    /// Stroke the outline of a rectangle
    fn stroke_rect(&mut self, rect: ViewRect, color: [u8; 4], width: f32);

    /// Draw a text label with its baseline origin at (x, y)
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: [u8; 4], size: f32);
}

/// Raster surface backed by an RGBA canvas of the viewport size
pub struct ImageSurface {
    canvas: RgbaImage,
    /// Labels are only rasterized when a font is available
    font: Option<FontArc>,
}

impl ImageSurface {
    /// Create a canvas filled with `background`
    pub fn new(width: u32, height: u32, background: [u8; 4]) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, Rgba(background)),
            font: None,
        }
    }

    /// Rasterize labels with `font`
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Blit a bitmap at the given view position; parts outside are clipped
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, x: f32, y: f32) {
        imageops::overlay(&mut self.canvas, &bitmap.pixels, x.round() as i64, y.round() as i64);
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}

impl Surface for ImageSurface {
    fn size(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn stroke_rect(&mut self, rect: ViewRect, color: [u8; 4], width: f32) {
        if rect.is_empty() {
            return;
        }

        // The stroke is centred on the rectangle edge, one hollow rect per pixel of width
        let passes = width.round().max(1.0) as i64;
        let half = passes / 2;
        // Float-to-int casts saturate, so far-away edges stay at the i64 bounds
        let left = (rect.left.round() as i64).saturating_sub(half);
        let top = (rect.top.round() as i64).saturating_sub(half);
        let right = (rect.right.round() as i64).saturating_add(half);
        let bottom = (rect.bottom.round() as i64).saturating_add(half);

        let (w, h) = self.size();
        for i in 0..passes {
            let (l, t) = (left.saturating_add(i), top.saturating_add(i));
            let (r, b) = (right.saturating_sub(i), bottom.saturating_sub(i));
            if r <= l || b <= t {
                break;
            }
            // Entirely off-canvas outlines are skipped; imageproc clips the rest
            if r < 0 || b < 0 || l >= w as i64 || t >= h as i64 {
                continue;
            }
            let (l, t) = (l.max(-1), t.max(-1));
            let (r, b) = (r.min(w as i64 + 1), b.min(h as i64 + 1));
            draw_hollow_rect_mut(
                &mut self.canvas,
                Rect::at(l as i32, t as i32).of_size((r - l) as u32, (b - t) as u32),
                Rgba(color),
            );
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: [u8; 4], size: f32) {
        let Some(font) = &self.font else {
            trace!("No label font, skipping {:?} at ({:.1}, {:.1})", text, x, y);
            return;
        };
        if text.is_empty() || !(size > 0.0) {
            return;
        }

        // (x, y) is the baseline origin; imageproc positions text by its top edge
        let top = y - size;
        let (w, h) = self.size();
        let max_width = size * text.chars().count() as f32;
        if !(x < w as f32 && top < h as f32 && x + max_width > 0.0 && y > 0.0) {
            return;
        }
        // imageproc adds glyph offsets in i32
        if x.abs() > LABEL_REACH || top.abs() > LABEL_REACH {
            return;
        }

        draw_text_mut(
            &mut self.canvas,
            Rgba(color),
            x.round() as i32,
            top.round() as i32,
            PxScale::from(size),
            font,
            text,
        );
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    StrokeRect {
        rect: ViewRect,
        color: [u8; 4],
        width: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: [u8; 4],
        size: f32,
    },
}

/// Surface that records draw calls instead of painting them
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Recorded rectangles in paint order
    pub fn rects(&self) -> Vec<ViewRect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokeRect { rect, .. } => Some(*rect),
                DrawOp::Text { .. } => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn stroke_rect(&mut self, rect: ViewRect, color: [u8; 4], width: f32) {
        self.ops.push(DrawOp::StrokeRect { rect, color, width });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: [u8; 4], size: f32) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            color,
            size,
        });
    }
}
