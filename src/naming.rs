//! Deterministic content naming for published posts.
//!
//! Published posts follow a `YYYYMMDD_slug` convention:
//! - `20250102_hello_world.md` — the content file
//! - `static/images/blog/20250102_hello_world/` — its asset directory
//!
//! Both sides derive from the same stem, which is a pure function of the
//! post's date and title. That purity is load-bearing: re-publishing an
//! archived draft must land on exactly the same paths, so publishing twice
//! overwrites instead of duplicating.

use chrono::{DateTime, Utc};

/// Convert a title to a filename- and URL-safe slug.
///
/// Lowercases, collapses every run of non-alphanumeric characters to a single
/// underscore, and trims leading/trailing separators:
/// - `"Hello World"` → `"hello_world"`
/// - `"Rust's  Iterators — Part 2!"` → `"rust_s_iterators_part_2"`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_sep = true; // suppress leading separator
    for ch in title.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
            prev_sep = false;
        } else if !prev_sep {
            slug.push('_');
            prev_sep = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Derive the shared stem for a post's content file and asset directory.
pub fn content_stem(date: &DateTime<Utc>, title: &str) -> String {
    format!("{}_{}", date.format("%Y%m%d"), slugify(title))
}

/// Derive the content filename (`{stem}.md`).
pub fn content_filename(date: &DateTime<Utc>, title: &str) -> String {
    format!("{}.md", content_stem(date, title))
}
