//! The publish pipeline.
//!
//! Runs the stages in order:
//!
//! ```text
//! Validating -> Planning -> Executing -> Archiving
//! ```
//!
//! A dry run stops after Planning and returns the plan untouched. Errors
//! carry the stage they happened in, so the CLI can tell the user exactly
//! how far the run got.

use crate::archive::{self, ArchiveError};
use crate::config::SiteConfig;
use crate::execute::{self, ExecuteError};
use crate::imaging::{ImageBackend, Quality};
use crate::plan::{self, PlanError, PublishPlan};
use crate::scan::{self, ScanError};
use chrono::Utc;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Planning,
    Executing,
    Archiving,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Planning => "planning",
            Stage::Executing => "executing",
            Stage::Archiving => "archiving",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct PublishError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Plan only; write nothing, move nothing.
    pub dry_run: bool,
    /// Overrides the configured maximum image width.
    pub max_width: Option<u32>,
}

#[derive(Debug)]
pub struct PublishOutcome {
    pub plan: PublishPlan,
    /// False for dry runs.
    pub executed: bool,
}

pub fn publish(
    backend: &dyn ImageBackend,
    draft_path: &Path,
    site_root: &Path,
    config: &SiteConfig,
    options: PublishOptions,
) -> Result<PublishOutcome, PublishError> {
    let draft = scan::load_draft(draft_path, &config.archive_dir).map_err(|e| PublishError {
        stage: Stage::Validating,
        source: e.into(),
    })?;

    let mut config = config.clone();
    if let Some(max_width) = options.max_width {
        config.images.max_width = max_width;
    }

    let plan = plan::plan(backend, &draft, site_root, &config, Utc::now()).map_err(|e| {
        PublishError {
            stage: Stage::Planning,
            source: e.into(),
        }
    })?;

    if options.dry_run {
        return Ok(PublishOutcome {
            plan,
            executed: false,
        });
    }

    let quality = Quality::new(config.images.jpeg_quality);
    execute::execute(backend, &plan, quality).map_err(|e| PublishError {
        stage: Stage::Executing,
        source: e.into(),
    })?;

    // A draft that carried its own date is archived byte-for-byte. One
    // that did not gets normalized front matter over the original body,
    // pinning the date resolved from the wall clock.
    let pinned = (!draft.raw.has_authored_date())
        .then(|| execute::render_document(&plan.front_matter, &draft.body));
    archive::archive(&plan.archive, pinned.as_deref()).map_err(|e| PublishError {
        stage: Stage::Archiving,
        source: e.into(),
    })?;

    Ok(PublishOutcome {
        plan,
        executed: true,
    })
}
