//! Draft archiving.
//!
//! After a successful publish the draft moves into the archive directory
//! next to it, renamed to the derived content filename, and its `assets/`
//! directory moves alongside. The draft is preserved byte-for-byte, except
//! when its date was resolved from the wall clock: then the archived copy
//! is written with normalized front matter so the date is pinned and a
//! later re-publish derives the same name again.

use crate::plan::ArchivePlan;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Archive the draft per the plan. `pinned` is `Some(normalized text)` when
/// the run resolved a date the draft did not carry (resolved front matter
/// over the original, un-rewritten body); `None` moves the draft unchanged.
pub fn archive(plan: &ArchivePlan, pinned: Option<&str>) -> Result<(), ArchiveError> {
    if let Some(parent) = plan.draft_to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match pinned {
        Some(document) => {
            std::fs::write(&plan.draft_to, document)?;
            if plan.draft_from != plan.draft_to {
                std::fs::remove_file(&plan.draft_from)?;
            }
        }
        None => {
            if plan.draft_from != plan.draft_to {
                move_file(&plan.draft_from, &plan.draft_to)?;
            }
        }
    }

    if let Some(assets_from) = &plan.assets_from {
        if plan.assets_to.exists() {
            std::fs::remove_dir_all(&plan.assets_to)?;
        }
        move_dir(assets_from, &plan.assets_to)?;
    }

    Ok(())
}

fn move_file(from: &Path, to: &Path) -> Result<(), ArchiveError> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)?;
    Ok(())
}

/// Rename, falling back to copy-and-remove for cross-device moves.
fn move_dir(from: &Path, to: &Path) -> Result<(), ArchiveError> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_dir_recursive(from, to)?;
    std::fs::remove_dir_all(from)?;
    Ok(())
}

fn copy_dir_recursive(from: &Path, to: &Path) -> Result<(), std::io::Error> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let dest = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &dest)?;
        } else {
            std::fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}
