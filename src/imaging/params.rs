//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`plan`](crate::plan) module (which decides what
//! happens to each image) and the [`backend`](super::backend) (which does the
//! actual pixel work). This separation allows swapping backends (e.g. for
//! testing with a mock) without changing pipeline logic.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
///
/// Only applied when re-encoding JPEG output; lossless formats ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Full specification for a width-limited resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Exact target dimensions, already aspect-corrected by the planner.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
