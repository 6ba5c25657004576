//! Image Source Layer
//!
//! Loads the image asset shown in the viewer and scales it to the viewport.
//! Decoding is delegated entirely to the `image` crate.

pub mod frame;
pub mod scale;

pub use frame::Bitmap;
pub use scale::scale_to_fit;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Decode an image file into an RGBA bitmap
pub fn load_bitmap(path: &Path) -> Result<Bitmap> {
    let decoded = image::open(path)
        .with_context(|| format!("Failed to load image asset {:?}", path))?;
    let bitmap = Bitmap::new(decoded.to_rgba8());
    info!("Loaded {:?} ({}x{})", path, bitmap.width(), bitmap.height());
    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bitmap_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        Bitmap::filled(12, 8, [255, 255, 255, 255]).pixels.save(&path).unwrap();

        let bitmap = load_bitmap(&path).unwrap();
        assert_eq!(bitmap.dimensions(), (12, 8));
    }

    #[test]
    fn test_load_bitmap_missing_file() {
        assert!(load_bitmap(Path::new("/nonexistent/page.png")).is_err());
    }
}
