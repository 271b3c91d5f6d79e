//! Plan execution.
//!
//! Executes a [`PublishPlan`]: creates the target directories, runs the
//! planned image operations through the backend, and writes the content file.
//! Re-running the same plan overwrites its own outputs, which is what makes
//! re-publishing idempotent.

use crate::frontmatter::{self, FrontMatter};
use crate::imaging::{BackendError, ImageBackend, Quality, ResizeParams};
use crate::plan::{ImageAction, PublishPlan};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Imaging(#[from] BackendError),
}

/// Assemble the final content file: front matter between delimiters, then
/// the rewritten body.
pub fn render_document(front_matter: &FrontMatter, body: &str) -> String {
    format!(
        "{delim}\n{yaml}{delim}\n{body}",
        delim = frontmatter::DELIMITER,
        yaml = front_matter.to_yaml(),
        body = body,
    )
}

/// Write everything the plan calls for: image assets first, content file
/// last, so a failure mid-run never leaves a content file pointing at
/// images that were not shipped.
pub fn execute(
    backend: &dyn ImageBackend,
    plan: &PublishPlan,
    quality: Quality,
) -> Result<(), ExecuteError> {
    if !plan.images.is_empty() {
        std::fs::create_dir_all(&plan.asset_dir)?;
    }

    for image in &plan.images {
        match &image.action {
            ImageAction::Resize { to, .. } => backend.resize(&ResizeParams {
                source: image.source.clone(),
                output: image.dest.clone(),
                width: to.width,
                height: to.height,
                quality,
            })?,
            ImageAction::Copy { .. } => backend.copy(&image.source, &image.dest)?,
        }
    }

    if let Some(parent) = plan.content_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(
        &plan.content_path,
        render_document(&plan.front_matter, &plan.body),
    )?;

    Ok(())
}
