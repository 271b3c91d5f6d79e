//! Pure-Rust image backend built on the `image` crate.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ResizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        // Reads only the header, not the pixel data.
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to identify: {}", e)))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = ImageReader::open(&params.source)?
            .decode()
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode: {}", e)))?;

        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);

        save_image(&resized, &params.output, params.quality.value())
    }

    fn copy(&self, source: &Path, output: &Path) -> Result<(), BackendError> {
        std::fs::copy(source, output)?;
        Ok(())
    }
}

/// Encode by output extension. JPEG honors the quality knob; PNG and WebP
/// are written lossless.
fn save_image(img: &DynamicImage, output: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => {
            let file = File::create(output)?;
            let writer = BufWriter::new(file);
            let encoder = JpegEncoder::new_with_quality(writer, quality as u8);
            img.to_rgb8()
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("Failed to encode: {}", e)))
        }
        "png" => img
            .save_with_format(output, ImageFormat::Png)
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to encode: {}", e))),
        "webp" => {
            let file = File::create(output)?;
            let writer = BufWriter::new(file);
            let encoder = WebPEncoder::new_lossless(writer);
            img.to_rgba8()
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("Failed to encode: {}", e)))
        }
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}
