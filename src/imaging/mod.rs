//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | Lanczos3 via `image::imageops` |
//! | **Encode JPEG** | `JpegEncoder` at configured quality |
//! | **Encode PNG / WebP** | lossless encoders |
//! | **Copy** | byte-for-byte `std::fs::copy` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_width;
pub use params::{Quality, ResizeParams};
pub use rust_backend::RustBackend;
