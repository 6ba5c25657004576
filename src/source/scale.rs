//! Scale-to-fit resampling
//!
//! The scaled bitmap and its [`FitTransform`] always come from the same
//! computation, so the displayed image and the overlay cannot drift apart.

use image::imageops::{self, FilterType};
use tracing::debug;

use crate::overlay::transform::{compute_fit_transform_aligned, Alignment, FitTransform, TransformError};
use crate::source::frame::Bitmap;

/// Resample `bitmap` to fit inside the viewport
///
/// Returns the scaled bitmap together with the transform that produced it.
pub fn scale_to_fit(
    bitmap: &Bitmap,
    viewport_width: u32,
    viewport_height: u32,
    alignment: Alignment,
) -> Result<(Bitmap, FitTransform), TransformError> {
    let fit = compute_fit_transform_aligned(
        bitmap.width(),
        bitmap.height(),
        viewport_width,
        viewport_height,
        alignment,
    )?;

    debug!(
        "Scaling {}x{} -> {}x{} (factor {:.3})",
        bitmap.width(),
        bitmap.height(),
        fit.scaled_width,
        fit.scaled_height,
        fit.scale
    );

    let scaled = if (fit.scaled_width, fit.scaled_height) == bitmap.dimensions() {
        bitmap.pixels.clone()
    } else {
        imageops::resize(&bitmap.pixels, fit.scaled_width, fit.scaled_height, FilterType::Triangle)
    };

    Ok((Bitmap::new(scaled), fit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_to_fit_matches_transform() {
        let bitmap = Bitmap::filled(1000, 2000, [0, 0, 0, 255]);
        let (scaled, fit) = scale_to_fit(&bitmap, 500, 500, Alignment::TopLeft).unwrap();

        assert_eq!(scaled.dimensions(), (250, 500));
        assert_eq!((fit.scaled_width, fit.scaled_height), scaled.dimensions());
        assert!((fit.scale - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_to_fit_same_size_is_copy() {
        let bitmap = Bitmap::filled(64, 32, [10, 20, 30, 255]);
        let (scaled, fit) = scale_to_fit(&bitmap, 64, 32, Alignment::TopLeft).unwrap();
        assert_eq!(scaled.pixels, bitmap.pixels);
        assert!((fit.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_to_fit_rejects_empty_viewport() {
        let bitmap = Bitmap::filled(4, 4, [0, 0, 0, 255]);
        assert!(scale_to_fit(&bitmap, 0, 10, Alignment::TopLeft).is_err());
    }

    #[test]
    fn test_rescaling_twice_is_stable() {
        let bitmap = Bitmap::filled(800, 600, [0, 0, 0, 255]);
        let (first, _) = scale_to_fit(&bitmap, 400, 400, Alignment::Center).unwrap();
        let (second, fit) = scale_to_fit(&first, 400, 400, Alignment::Center).unwrap();
        assert_eq!(first.dimensions(), second.dimensions());
        assert!((fit.scale - 1.0).abs() < 1e-6);
        assert_eq!(fit.offset_y, 50.0);
    }
}
