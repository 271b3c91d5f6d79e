//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Calculate the target dimensions for fitting an image within a maximum
/// width.
///
/// Returns `None` when the image is already at or under `max_width` — the
/// caller copies it unchanged. Otherwise width becomes `max_width` and height
/// is recomputed to preserve the aspect ratio exactly, with integer rounding
/// only at the final pixel dimension:
///
/// ```
/// # use draftpress::imaging::{Dimensions, fit_width};
/// // 3000x2000 at max 1920 → 1920x1280
/// let dims = Dimensions { width: 3000, height: 2000 };
/// assert_eq!(
///     fit_width(dims, 1920),
///     Some(Dimensions { width: 1920, height: 1280 })
/// );
///
/// // Already small enough → no resize
/// let dims = Dimensions { width: 800, height: 600 };
/// assert_eq!(fit_width(dims, 1920), None);
/// ```
pub fn fit_width(dims: Dimensions, max_width: u32) -> Option<Dimensions> {
    if dims.width <= max_width {
        return None;
    }
    let height = (dims.height as f64 * max_width as f64 / dims.width as f64).round() as u32;
    Some(Dimensions {
        width: max_width,
        // A sliver-thin panorama must still be at least one pixel tall
        height: height.max(1),
    })
}
