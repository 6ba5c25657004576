//! Decoded bitmap data consumed by the viewer

use image::RgbaImage;

/// A decoded RGBA bitmap
#[derive(Debug, Clone)]
pub struct Bitmap {
    /// Pixel data
    pub pixels: RgbaImage,
}

impl Bitmap {
    /// Wrap an already decoded image
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Solid-colour bitmap
    #[cfg(test)]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Get bitmap dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_dimensions() {
        let bitmap = Bitmap::filled(7, 3, [1, 2, 3, 255]);
        assert_eq!(bitmap.dimensions(), (7, 3));
        assert_eq!(bitmap.pixels.get_pixel(6, 2).0, [1, 2, 3, 255]);
    }
}
