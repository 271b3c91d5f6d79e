//! Draft loading and image reference discovery.
//!
//! A draft is a single Markdown file with YAML front matter. This module
//! reads it from disk, hands the front matter to [`frontmatter`], and walks
//! the body's Markdown events to find every inline image reference together
//! with the byte span of its URL, so later stages can rewrite refs in place
//! without disturbing any other byte of the body.
//!
//! [`frontmatter`]: crate::frontmatter

use crate::frontmatter::{self, FrontMatterError, RawFrontMatter};
use pulldown_cmark::{Event, Parser, Tag};
use std::ops::Range;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Draft not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a Markdown file: {0}")]
    NotMarkdown(PathBuf),
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
}

/// A draft post loaded from disk, front matter parsed but not yet normalized.
#[derive(Debug)]
pub struct Draft {
    /// Path the draft was loaded from.
    pub path: PathBuf,
    /// Directory containing the draft.
    pub dir: PathBuf,
    pub raw: RawFrontMatter,
    pub body: String,
    /// True when the draft already sits inside the archive directory,
    /// i.e. this is a re-publish of an earlier run.
    pub in_archive: bool,
}

/// Load and parse a draft. Fails on missing files, non-`.md` extensions,
/// and any front matter problem.
pub fn load_draft(path: &Path, archive_dir_name: &str) -> Result<Draft, ScanError> {
    if !path.exists() {
        return Err(ScanError::NotFound(path.to_path_buf()));
    }
    if path.extension().and_then(|e| e.to_str()) != Some("md") {
        return Err(ScanError::NotMarkdown(path.to_path_buf()));
    }

    let document = std::fs::read_to_string(path)?;
    let (raw, body) = frontmatter::parse(&document)?;

    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let in_archive = path
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name == archive_dir_name));

    Ok(Draft {
        path: path.to_path_buf(),
        dir,
        raw,
        body: body.to_string(),
        in_archive,
    })
}

/// An image reference found in the body.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub url: String,
    /// Byte range of the URL inside the body string.
    pub url_span: Range<usize>,
}

/// How an image URL should be treated by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Remote URL, left untouched.
    Remote,
    /// Already points at the published image tree, left untouched.
    AlreadyPublished,
    /// Local path, relative to the draft's directory.
    Local,
}

pub fn classify(url: &str, url_prefix: &str) -> RefKind {
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//") {
        RefKind::Remote
    } else if url
        .strip_prefix(url_prefix)
        .is_some_and(|rest| rest.starts_with('/'))
    {
        // Prefix must end at a path-segment boundary: `/images/blogroll/x`
        // is not under `/images/blog`.
        RefKind::AlreadyPublished
    } else {
        RefKind::Local
    }
}

/// Find every inline image reference in the body, with the byte span of its
/// URL.
///
/// Uses the Markdown parser's offset iterator rather than a regex, so refs
/// inside code blocks are never picked up. The URL span is located by
/// searching forward from the bracket that closes the alt text, so neither
/// alt text nor a ref title containing the same string can steal the match.
/// Reference-style images, whose URL lives in a link definition outside the
/// event span, are silently skipped.
pub fn find_image_refs(body: &str) -> Vec<ImageRef> {
    let mut refs = Vec::new();

    for (event, range) in Parser::new(body).into_offset_iter() {
        if let Event::Start(Tag::Image { dest_url, .. }) = event {
            if dest_url.is_empty() {
                continue;
            }
            let snippet = &body[range.clone()];
            if let Some(pos) = dest_position(snippet, &dest_url) {
                let start = range.start + pos;
                refs.push(ImageRef {
                    url: dest_url.to_string(),
                    url_span: start..start + dest_url.len(),
                });
            }
        }
    }

    refs
}

/// Locate `url` inside an inline image's source text (`![alt](url "title")`).
///
/// Walks to the bracket that closes the alt text (brackets nest, so depth is
/// tracked) and takes the first occurrence of the URL after it. The first
/// occurrence is the destination itself; a title quoting the same string
/// comes later.
fn dest_position(snippet: &str, url: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut close = None;
    for (i, b) in snippet.bytes().enumerate() {
        match b {
            b'[' => depth += 1,
            b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;
    snippet[close..].find(url).map(|pos| close + pos)
}

/// Apply URL replacements to the body. Each replacement pairs a byte span
/// from [`find_image_refs`] with its new URL; spans must not overlap.
/// Applied back to front so earlier spans stay valid.
pub fn rewrite_refs(body: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut sorted: Vec<&(Range<usize>, String)> = replacements.iter().collect();
    sorted.sort_by_key(|(span, _)| span.start);

    let mut result = body.to_string();
    for (span, url) in sorted.into_iter().rev() {
        result.replace_range(span.clone(), url);
    }
    result
}
