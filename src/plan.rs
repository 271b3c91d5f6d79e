//! Publish planning.
//!
//! The planner turns a loaded draft into a [`PublishPlan`]: the full set of
//! writes, resizes, copies, and moves a publish run will perform. Planning is
//! all-or-nothing — every referenced local image must exist and every check
//! must pass before the plan is returned, so execution never starts against a
//! half-valid draft. Planning never writes to disk, which is what makes
//! `--dry-run` trustworthy: it is the real planner, not a simulation.

use crate::config::SiteConfig;
use crate::frontmatter::FrontMatter;
use crate::imaging::{Dimensions, ImageBackend, fit_width};
use crate::naming;
use crate::scan::{self, Draft, RefKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Referenced image not found: {0}")]
    ImageNotFound(PathBuf),
}

/// Everything a publish run will do, computed up front.
#[derive(Debug, Serialize)]
pub struct PublishPlan {
    /// Derived content filename, `YYYYMMDD_slug.md`.
    pub filename: String,
    /// Filename without the `.md` extension; also the asset directory name.
    pub stem: String,
    /// Absolute path the content file will be written to.
    pub content_path: PathBuf,
    /// Absolute path image assets will be written under.
    pub asset_dir: PathBuf,
    pub front_matter: FrontMatter,
    pub images: Vec<ImagePlan>,
    pub skipped: Vec<SkippedImage>,
    /// Body with local image refs rewritten to site-absolute URLs.
    pub body: String,
    pub archive: ArchivePlan,
}

#[derive(Debug, Serialize)]
pub struct ImagePlan {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Site-absolute URL the ref is rewritten to.
    pub url: String,
    pub action: ImageAction,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageAction {
    /// Wider than the configured maximum; resized down on execute.
    Resize { from: Dimensions, to: Dimensions },
    /// Copied unchanged. Dimensions are `None` when the file could not be
    /// identified; it is still copied byte-for-byte.
    Copy { dims: Option<Dimensions> },
}

#[derive(Debug, Serialize)]
pub struct SkippedImage {
    pub url: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Remote,
    AlreadyPublished,
}

/// Where the draft and its assets move after a successful publish.
#[derive(Debug, Serialize)]
pub struct ArchivePlan {
    pub draft_from: PathBuf,
    pub draft_to: PathBuf,
    /// Draft-local `assets/` directory, when present.
    pub assets_from: Option<PathBuf>,
    pub assets_to: PathBuf,
    /// True when the draft already lives in the archive; the move becomes a
    /// rename-in-place (or nothing, when the name already matches).
    pub already_archived: bool,
}

/// Build the full plan for publishing `draft`. Pure with respect to the
/// filesystem apart from reads: existence checks and image identification.
pub fn plan(
    backend: &dyn ImageBackend,
    draft: &Draft,
    site_root: &std::path::Path,
    config: &SiteConfig,
    now: DateTime<Utc>,
) -> Result<PublishPlan, PlanError> {
    let front_matter = draft.raw.normalize(now, &config.front_matter.kind);
    let stem = naming::content_stem(&front_matter.date, &front_matter.title);
    let filename = naming::content_filename(&front_matter.date, &front_matter.title);

    let content_path = site_root.join(&config.content_dir).join(&filename);
    let asset_dir = site_root.join(&config.static_dir).join(&stem);

    let mut images: Vec<ImagePlan> = Vec::new();
    let mut skipped = Vec::new();
    let mut replacements: Vec<(std::ops::Range<usize>, String)> = Vec::new();

    for image_ref in scan::find_image_refs(&draft.body) {
        match scan::classify(&image_ref.url, &config.url_prefix) {
            RefKind::Remote => skipped.push(SkippedImage {
                url: image_ref.url,
                reason: SkipReason::Remote,
            }),
            RefKind::AlreadyPublished => skipped.push(SkippedImage {
                url: image_ref.url,
                reason: SkipReason::AlreadyPublished,
            }),
            RefKind::Local => {
                let source = resolve_source(draft, &image_ref.url)?;
                let name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .ok_or_else(|| PlanError::ImageNotFound(source.clone()))?;

                let dest = asset_dir.join(&name);
                let url = format!("{}/{}/{}", config.url_prefix, stem, name);
                replacements.push((image_ref.url_span, url.clone()));

                // The same image referenced twice gets one plan entry.
                if images.iter().any(|p| p.dest == dest) {
                    continue;
                }

                let action = match backend.identify(&source) {
                    Ok(dims) => match fit_width(dims, config.images.max_width) {
                        Some(target) => ImageAction::Resize {
                            from: dims,
                            to: target,
                        },
                        None => ImageAction::Copy { dims: Some(dims) },
                    },
                    // Undecodable by the backend; still worth shipping as-is.
                    Err(_) => ImageAction::Copy { dims: None },
                };

                images.push(ImagePlan {
                    source,
                    dest,
                    url,
                    action,
                });
            }
        }
    }

    let body = scan::rewrite_refs(&draft.body, &replacements);

    let archive = plan_archive(draft, &filename, &config.archive_dir);

    Ok(PublishPlan {
        filename,
        stem,
        content_path,
        asset_dir,
        front_matter,
        images,
        skipped,
        body,
        archive,
    })
}

/// Resolve a local image ref against the draft directory. A draft being
/// re-published from inside the archive may still reference images relative
/// to its original location, so the archive's parent is tried as a fallback.
fn resolve_source(draft: &Draft, url: &str) -> Result<PathBuf, PlanError> {
    let source = draft.dir.join(url);
    if source.exists() {
        return Ok(source);
    }
    if draft.in_archive {
        if let Some(parent) = draft.dir.parent() {
            let fallback = parent.join(url);
            if fallback.exists() {
                return Ok(fallback);
            }
        }
    }
    Err(PlanError::ImageNotFound(source))
}

fn plan_archive(draft: &Draft, filename: &str, archive_dir: &str) -> ArchivePlan {
    if draft.in_archive {
        // Assets, if any, already live in the archive; nothing moves.
        ArchivePlan {
            draft_from: draft.path.clone(),
            draft_to: draft.dir.join(filename),
            assets_from: None,
            assets_to: draft.dir.join("assets"),
            already_archived: true,
        }
    } else {
        let archive = draft.dir.join(archive_dir);
        ArchivePlan {
            draft_from: draft.path.clone(),
            draft_to: archive.join(filename),
            assets_from: existing_assets(&draft.dir),
            assets_to: archive.join("assets"),
            already_archived: false,
        }
    }
}

fn existing_assets(dir: &std::path::Path) -> Option<PathBuf> {
    let assets = dir.join("assets");
    assets.is_dir().then_some(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::scan::load_draft;
    use chrono::TimeZone;
    use std::path::Path;
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    fn write_draft(dir: &Path, body: &str) -> PathBuf {
        let content = format!(
            "---\ntitle: Hello World\ncategories: [dev]\ntags: [rust]\n---\n{body}"
        );
        let path = dir.join("hello.md");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"fake image bytes").unwrap();
    }

    #[test]
    fn plan_derives_paths_from_date_and_title() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        std::fs::create_dir(&drafts).unwrap();
        let path = write_draft(&drafts, "No images here.\n");

        let draft = load_draft(&path, "published").unwrap();
        let backend = MockBackend::new();
        let plan = plan(
            &backend,
            &draft,
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(plan.filename, "20240315_hello_world.md");
        assert_eq!(plan.stem, "20240315_hello_world");
        assert_eq!(
            plan.content_path,
            site.path().join("content/blog/20240315_hello_world.md")
        );
        assert_eq!(
            plan.asset_dir,
            site.path().join("static/images/blog/20240315_hello_world")
        );
    }

    #[test]
    fn plan_fails_when_image_missing() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        std::fs::create_dir(&drafts).unwrap();
        let path = write_draft(&drafts, "![missing](assets/gone.png)\n");

        let draft = load_draft(&path, "published").unwrap();
        let backend = MockBackend::new();
        let result = plan(
            &backend,
            &draft,
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        );

        assert!(matches!(result, Err(PlanError::ImageNotFound(_))));
        // Nothing touched identify; the existence check fails first.
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn plan_resizes_wide_images_and_copies_narrow_ones() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        std::fs::create_dir(&drafts).unwrap();
        let path = write_draft(&drafts, "![wide](assets/wide.jpg)\n![thin](assets/thin.png)\n");
        touch(&drafts.join("assets/wide.jpg"));
        touch(&drafts.join("assets/thin.png"));

        // Popped in reverse order: wide first, then thin.
        let backend = MockBackend::with_dimensions(vec![
            Dimensions {
                width: 800,
                height: 600,
            },
            Dimensions {
                width: 3000,
                height: 2000,
            },
        ]);

        let plan = plan(
            &backend,
            &draft_at(&path),
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(plan.images.len(), 2);
        assert!(matches!(
            plan.images[0].action,
            ImageAction::Resize {
                from: Dimensions {
                    width: 3000,
                    height: 2000
                },
                to: Dimensions {
                    width: 1920,
                    height: 1280
                },
            }
        ));
        assert!(matches!(
            plan.images[1].action,
            ImageAction::Copy { dims: Some(_) }
        ));
    }

    #[test]
    fn plan_rewrites_local_refs_only() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        std::fs::create_dir(&drafts).unwrap();
        let body = "![a](assets/a.jpg)\n![r](https://example.com/r.png)\n![p](/images/blog/old/p.png)\n";
        let path = write_draft(&drafts, body);
        touch(&drafts.join("assets/a.jpg"));

        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 100,
            height: 100,
        }]);
        let plan = plan(
            &backend,
            &draft_at(&path),
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        assert!(
            plan.body
                .contains("![a](/images/blog/20240315_hello_world/a.jpg)")
        );
        assert!(plan.body.contains("![r](https://example.com/r.png)"));
        assert!(plan.body.contains("![p](/images/blog/old/p.png)"));
        assert_eq!(plan.skipped.len(), 2);
        assert_eq!(plan.skipped[0].reason, SkipReason::Remote);
        assert_eq!(plan.skipped[1].reason, SkipReason::AlreadyPublished);
    }

    #[test]
    fn plan_dedupes_repeated_refs() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        std::fs::create_dir(&drafts).unwrap();
        let path = write_draft(&drafts, "![a](assets/a.jpg)\n![again](assets/a.jpg)\n");
        touch(&drafts.join("assets/a.jpg"));

        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 100,
            height: 100,
        }]);
        let plan = plan(
            &backend,
            &draft_at(&path),
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(plan.images.len(), 1);
        // Both refs still rewritten.
        assert_eq!(
            plan.body.matches("/images/blog/20240315_hello_world/a.jpg").count(),
            2
        );
    }

    #[test]
    fn unidentifiable_image_becomes_plain_copy() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        std::fs::create_dir(&drafts).unwrap();
        let path = write_draft(&drafts, "![odd](assets/odd.gif)\n");
        touch(&drafts.join("assets/odd.gif"));

        // No stacked dimensions: identify fails.
        let backend = MockBackend::new();
        let plan = plan(
            &backend,
            &draft_at(&path),
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        assert!(matches!(
            plan.images[0].action,
            ImageAction::Copy { dims: None }
        ));
    }

    #[test]
    fn planning_performs_no_writes() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        std::fs::create_dir(&drafts).unwrap();
        let path = write_draft(&drafts, "![a](assets/a.jpg)\n");
        touch(&drafts.join("assets/a.jpg"));

        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 3000,
            height: 2000,
        }]);
        plan(
            &backend,
            &draft_at(&path),
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        // Identify only; no resize or copy was asked of the backend.
        let ops = backend.get_operations();
        assert!(ops.iter().all(|op| matches!(op, RecordedOp::Identify(_))));
        assert!(!site.path().join("content").exists());
        assert!(!site.path().join("static").exists());
    }

    #[test]
    fn archive_plan_targets_sibling_published_dir() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        std::fs::create_dir(&drafts).unwrap();
        let path = write_draft(&drafts, "No images.\n");
        touch(&drafts.join("assets/a.jpg"));

        let backend = MockBackend::new();
        let plan = plan(
            &backend,
            &draft_at(&path),
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        assert!(!plan.archive.already_archived);
        assert_eq!(
            plan.archive.draft_to,
            drafts.join("published/20240315_hello_world.md")
        );
        assert_eq!(plan.archive.assets_from, Some(drafts.join("assets")));
        assert_eq!(plan.archive.assets_to, drafts.join("published/assets"));
    }

    #[test]
    fn archive_plan_for_republish_renames_in_place() {
        let site = TempDir::new().unwrap();
        let published = site.path().join("drafts/published");
        std::fs::create_dir_all(&published).unwrap();
        let path = write_draft(&published, "No images.\n");

        let backend = MockBackend::new();
        let plan = plan(
            &backend,
            &draft_at(&path),
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        assert!(plan.archive.already_archived);
        assert_eq!(
            plan.archive.draft_to,
            published.join("20240315_hello_world.md")
        );
    }

    #[test]
    fn republish_falls_back_to_parent_dir_for_images() {
        let site = TempDir::new().unwrap();
        let drafts = site.path().join("drafts");
        let published = drafts.join("published");
        std::fs::create_dir_all(&published).unwrap();
        let path = write_draft(&published, "![a](assets/a.jpg)\n");
        // Image lives next to the archive, under the original draft dir.
        touch(&drafts.join("assets/a.jpg"));

        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 100,
            height: 100,
        }]);
        let plan = plan(
            &backend,
            &draft_at(&path),
            site.path(),
            &SiteConfig::default(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(plan.images[0].source, drafts.join("assets/a.jpg"));
    }

    fn draft_at(path: &Path) -> Draft {
        load_draft(path, "published").unwrap()
    }
}
