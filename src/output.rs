//! User-facing output formatting.
//!
//! Format functions are pure and return lines, so tests can assert on report
//! content without capturing stdout. The `print_*` wrappers are the only
//! place that writes to the terminal.

use crate::plan::{ImageAction, PublishPlan, SkipReason};
use std::path::Path;

/// Render a path relative to the site root where possible; absolute paths in
/// reports are noise.
fn rel(path: &Path, site_root: &Path) -> String {
    path.strip_prefix(site_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Report for a dry run: everything the plan would do, nothing done yet.
pub fn format_plan(plan: &PublishPlan, site_root: &Path, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Would publish: {}", plan.filename));
    lines.push(format!("  Content: {}", rel(&plan.content_path, site_root)));

    if plan.images.is_empty() {
        lines.push("  Images: none".to_string());
    } else {
        lines.push(format!("  Images ({}):", plan.images.len()));
        for image in &plan.images {
            let action = match &image.action {
                ImageAction::Resize { from, to } => format!("resize {} -> {}", from, to),
                ImageAction::Copy { dims: Some(dims) } => format!("copy ({})", dims),
                ImageAction::Copy { dims: None } => "copy (dimensions unreadable)".to_string(),
            };
            lines.push(format!(
                "    {} -> {} [{}]",
                rel(&image.source, site_root),
                image.url,
                action
            ));
        }
    }

    if verbose && !plan.skipped.is_empty() {
        lines.push(format!("  Skipped ({}):", plan.skipped.len()));
        for skipped in &plan.skipped {
            let reason = match skipped.reason {
                SkipReason::Remote => "remote",
                SkipReason::AlreadyPublished => "already published",
            };
            lines.push(format!("    {} [{}]", skipped.url, reason));
        }
    }

    if plan.archive.already_archived {
        if plan.archive.draft_from == plan.archive.draft_to {
            lines.push("  Archive: already archived, name unchanged".to_string());
        } else {
            lines.push(format!(
                "  Archive: rename to {}",
                rel(&plan.archive.draft_to, site_root)
            ));
        }
    } else {
        lines.push(format!(
            "  Archive: move draft to {}",
            rel(&plan.archive.draft_to, site_root)
        ));
    }

    lines.push(String::new());
    lines.push("Dry run: nothing was written.".to_string());

    lines
}

/// Report for a completed publish, with the follow-up commands.
pub fn format_done(plan: &PublishPlan, site_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Published: {}", plan.filename));
    lines.push(format!("  Content: {}", rel(&plan.content_path, site_root)));
    if !plan.images.is_empty() {
        lines.push(format!(
            "  Images: {} -> {}",
            plan.images.len(),
            rel(&plan.asset_dir, site_root)
        ));
    }
    lines.push(format!(
        "  Draft archived: {}",
        rel(&plan.archive.draft_to, site_root)
    ));

    lines.push(String::new());
    lines.push("Next steps:".to_string());
    lines.push("  Preview:  hugo server -D".to_string());
    lines.push(format!(
        "  Commit:   git add {}",
        rel(&plan.content_path, site_root)
    ));
    if !plan.images.is_empty() {
        lines.push(format!(
            "            git add {}",
            rel(&plan.asset_dir, site_root)
        ));
    }

    lines
}

pub fn print_plan(plan: &PublishPlan, site_root: &Path, verbose: bool) {
    for line in format_plan(plan, site_root, verbose) {
        println!("{}", line);
    }
}

pub fn print_done(plan: &PublishPlan, site_root: &Path) {
    for line in format_done(plan, site_root) {
        println!("{}", line);
    }
}
