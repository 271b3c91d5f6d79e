//! # Draftpress
//!
//! Publish markdown drafts into a Hugo blog. You write posts in Typora (or any
//! editor) with local images in a sibling `assets/` directory; draftpress
//! validates the front matter, derives a date-prefixed slugified filename,
//! resizes oversized images into the site's static tree, rewrites image
//! references to their published URLs, and archives the original draft.
//!
//! # Architecture: Linear Stage Pipeline
//!
//! A publish run moves through four stages, each a function from value to
//! value. Any failure stops the run and is reported with its stage name:
//!
//! ```text
//! 1. Validating   draft.md   →  Draft         (front matter parsed + checked)
//! 2. Planning     Draft      →  PublishPlan   (names, image actions, rewrites)
//! 3. Executing    plan       →  content/ + static/   (the only writing stage)
//! 4. Archiving    plan       →  published/    (original draft moved aside)
//! ```
//!
//! The split between Planning and Executing exists for three reasons:
//!
//! - **All-or-nothing checks**: every referenced image is stat'd during
//!   Planning, so a single missing file aborts the run before anything is
//!   written.
//! - **Dry runs**: `--dry-run` stops after Planning and prints the plan; the
//!   plan is also serializable to JSON for inspection.
//! - **Testability**: Planning is pure given a clock value and an image
//!   backend, so unit tests exercise the pipeline logic without encoding a
//!   single pixel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | YAML front matter: split, validate, normalize, re-serialize |
//! | [`naming`] | Deterministic `YYYYMMDD_slug` filename derivation |
//! | [`scan`] | Draft loading and image reference discovery in the markdown body |
//! | [`plan`] | Stage 2 — destination paths, per-image actions, reference rewriting |
//! | [`execute`] | Stage 3 — image processing and content file writing |
//! | [`archive`] | Stage 4 — relocating the draft and its assets to `published/` |
//! | [`publish`] | Orchestrator tying the stages together, stage-tagged errors |
//! | [`config`] | `draftpress.toml` loading, validation, Hugo root detection |
//! | [`imaging`] | Pure-Rust image operations: identify, fit-width resize, copy |
//! | [`output`] | CLI output formatting for plan and done reports |
//!
//! # Design Decisions
//!
//! ## Deterministic Naming, Idempotent Re-Publish
//!
//! The content filename is a pure function of the post's date and title
//! (`20250102_hello_world.md`). Drafts are archived byte-for-byte; the one
//! exception is a draft without a date, whose archived copy carries the
//! clock-resolved date in its front matter. Either way re-running the
//! pipeline on an archived draft regenerates byte-identical output.
//! Publishing is safe to repeat; there is no conflict detection and no need
//! for any.
//!
//! ## No Rollback
//!
//! Planning front-loads every check that can fail (front matter shape, image
//! existence), so Executing failures are limited to filesystem faults. Partial
//! writes are not rolled back: because output is deterministic, re-running the
//! pipeline overwrites partial output with identical complete output.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling) for
//! everything: no ImageMagick, no system dependencies, a single self-contained
//! binary. Only oversized images are re-encoded — JPEG at a fixed quality,
//! PNG and WebP losslessly — images already within the width limit are copied
//! byte-for-byte.
//!
//! ## Hugo Owns Rendering
//!
//! Draftpress never renders markdown to HTML and never invokes `hugo` or
//! `git`. It only conforms to the site's layout conventions (`content/blog`,
//! `static/images/blog`) and leaves generation and version control to the
//! operator — the done report prints the suggested next commands instead.

pub mod archive;
pub mod config;
pub mod execute;
pub mod frontmatter;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod plan;
pub mod publish;
pub mod scan;
