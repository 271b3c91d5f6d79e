//! YAML front matter parsing, validation, and normalization.
//!
//! A draft starts with a `---` delimited YAML block followed by the markdown
//! body:
//!
//! ```text
//! ---
//! title: "Hello World"
//! categories:
//!   - howto
//! tags:
//!   - test
//! ---
//! Body content...
//! ```
//!
//! Parsing happens in two steps. [`parse`] extracts the block into a
//! [`RawFrontMatter`] — an untyped YAML mapping — and validates its shape:
//! `title`, `categories`, and `tags` must be present, the lists must actually
//! be lists (a bare scalar is a distinct error from a missing field), and
//! none of them may be empty. [`RawFrontMatter::normalize`] then produces a
//! typed [`FrontMatter`], filling defaults for `date`, `type`, and `draft`
//! without overwriting fields the author set. Unknown keys survive both steps
//! and round-trip into the published document.
//!
//! Normalization takes the clock as a parameter: given the same document and
//! the same instant it always produces the same result, which is what makes
//! re-publishing an archived draft deterministic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Front matter block delimiter line.
pub const DELIMITER: &str = "---";

/// Required fields, in reporting order.
const REQUIRED_FIELDS: [&str; 3] = ["title", "categories", "tags"];

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("no front matter found (expected a leading `---` delimited YAML block)")]
    Missing,
    #[error("front matter must be a YAML mapping of key/value pairs")]
    NotAMapping,
    #[error("invalid YAML front matter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("missing required front matter field: {0}")]
    MissingField(&'static str),
    #[error("front matter field '{0}' must be a list (YAML array)")]
    NotAList(&'static str),
}

/// Split a document into its raw YAML block and markdown body.
///
/// The opening `---` must be the first line; the closing `---` must start a
/// line of its own. Returns [`FrontMatterError::Missing`] when either
/// delimiter is absent.
pub fn split(document: &str) -> Result<(&str, &str), FrontMatterError> {
    let rest = document
        .strip_prefix(DELIMITER)
        .and_then(|r| r.strip_prefix('\n').or_else(|| r.strip_prefix("\r\n")))
        .ok_or(FrontMatterError::Missing)?;

    // The closing delimiter is a line holding `---` and nothing else
    // (trailing whitespace aside). A `----` line or a longer line that
    // merely starts with `---` must not close the block early.
    let mut from = 0;
    let close = loop {
        let idx = rest[from..]
            .find("\n---")
            .map(|i| i + from)
            .ok_or(FrontMatterError::Missing)?;
        let after = &rest[idx + "\n---".len()..];
        let line_rest = after.split('\n').next().unwrap_or("");
        if line_rest.trim().is_empty() {
            break idx;
        }
        from = idx + 1;
    };

    let yaml = &rest[..close];
    let after = &rest[close + "\n---".len()..];
    let body = match after.find('\n') {
        Some(nl) => &after[nl + 1..],
        None => "",
    };
    Ok((yaml, body))
}

/// Parse and validate the front matter of a document.
///
/// Returns the raw mapping and the body. Pure: no defaults are applied here,
/// and nothing is read from or written to disk.
pub fn parse(document: &str) -> Result<(RawFrontMatter, &str), FrontMatterError> {
    let (yaml, body) = split(document)?;
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let map = match value {
        serde_yaml::Value::Mapping(map) => map,
        _ => return Err(FrontMatterError::NotAMapping),
    };
    let raw = RawFrontMatter { map };
    raw.validate()?;
    Ok((raw, body))
}

/// Validated-but-untyped front matter, as authored.
#[derive(Debug, Clone)]
pub struct RawFrontMatter {
    map: serde_yaml::Mapping,
}

impl RawFrontMatter {
    fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.map.get(key)
    }

    /// Check required fields and list shapes.
    fn validate(&self) -> Result<(), FrontMatterError> {
        for field in REQUIRED_FIELDS {
            if self.get(field).is_none() {
                return Err(FrontMatterError::MissingField(field));
            }
        }

        let title_ok = self
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .is_some_and(|t| !t.is_empty());
        if !title_ok {
            return Err(FrontMatterError::MissingField("title"));
        }

        for field in ["categories", "tags"] {
            match self.get(field) {
                Some(serde_yaml::Value::Sequence(seq)) => {
                    if seq.is_empty() {
                        return Err(FrontMatterError::MissingField(field));
                    }
                }
                Some(_) => return Err(FrontMatterError::NotAList(field)),
                None => return Err(FrontMatterError::MissingField(field)),
            }
        }
        Ok(())
    }

    /// True when the author set a parseable `date`. Without one,
    /// normalization resolves the clock, and the archived copy must pin
    /// that resolved date to stay re-publishable.
    pub fn has_authored_date(&self) -> bool {
        self.get("date").and_then(parse_date).is_some()
    }

    /// Produce normalized front matter, defaulting `date` to `now`, `type` to
    /// `kind`, and `draft` to false. Fields the author set are never
    /// overwritten; unknown keys are carried into [`FrontMatter::extra`].
    pub fn normalize(&self, now: DateTime<Utc>, kind: &str) -> FrontMatter {
        let title = self
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim()
            .to_string();

        // Sub-second precision is dropped so the serialized form round-trips
        // through parse_date unchanged.
        let date = self.get("date").and_then(parse_date).unwrap_or(now);
        let date = date.with_nanosecond(0).unwrap_or(date);

        let kind = self
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or(kind)
            .to_string();

        let draft = self.get("draft").and_then(|v| v.as_bool()).unwrap_or(false);

        let categories = string_items(self.get("categories"));
        let tags = string_items(self.get("tags"));

        let known = ["title", "date", "type", "draft", "categories", "tags"];
        let extra: BTreeMap<String, serde_yaml::Value> = self
            .map
            .iter()
            .filter_map(|(k, v)| {
                let key = k.as_str()?;
                (!known.contains(&key)).then(|| (key.to_string(), v.clone()))
            })
            .collect();

        FrontMatter {
            title,
            date,
            kind,
            draft,
            categories,
            tags,
            extra,
        }
    }
}

/// Normalized front matter, ready to serialize into the published document.
///
/// Field order here is the serialization order, and `extra` is a BTreeMap, so
/// [`FrontMatter::to_yaml`] is deterministic — the same input always produces
/// the same bytes.
#[derive(Debug, Clone, Serialize)]
pub struct FrontMatter {
    pub title: String,
    #[serde(with = "hugo_date")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub draft: bool,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Serialize back to YAML (no delimiters, trailing newline included).
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self).expect("front matter serializes to YAML")
    }
}

/// Hugo-style timestamp serialization: `2025-01-02T15:04:05Z`.
mod hugo_date {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }
}

/// Parse a YAML date value. Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[Z]`, and
/// bare `YYYY-MM-DD` (midnight UTC). Unparseable values yield `None` and the
/// caller falls back to the clock.
fn parse_date(value: &serde_yaml::Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Collect sequence items as strings, stringifying scalars (`tags: [2024]`
/// is a number to YAML but a tag to Hugo).
fn string_items(value: Option<&serde_yaml::Value>) -> Vec<String> {
    let Some(serde_yaml::Value::Sequence(seq)) = value else {
        return Vec::new();
    };
    seq.iter()
        .filter_map(|item| match item {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    const VALID: &str = "---\n\
title: \"Hello World\"\n\
categories:\n  - howto\n\
tags:\n  - test\n\
---\n\
Body line.\n";

    // =========================================================================
    // split tests
    // =========================================================================

    #[test]
    fn split_returns_yaml_and_body() {
        let (yaml, body) = split(VALID).unwrap();
        assert!(yaml.contains("title:"));
        assert_eq!(body, "Body line.\n");
    }

    #[test]
    fn split_without_opening_delimiter_is_missing() {
        let result = split("title: x\n---\nbody");
        assert!(matches!(result, Err(FrontMatterError::Missing)));
    }

    #[test]
    fn split_without_closing_delimiter_is_missing() {
        let result = split("---\ntitle: x\nbody continues forever");
        assert!(matches!(result, Err(FrontMatterError::Missing)));
    }

    #[test]
    fn split_closing_delimiter_at_eof() {
        let (yaml, body) = split("---\ntitle: x\n---").unwrap();
        assert_eq!(yaml, "title: x");
        assert_eq!(body, "");
    }

    #[test]
    fn split_skips_lines_that_only_start_with_dashes() {
        // A `----` line inside the block must not close it.
        let doc = "---\ntitle: x\n----\nmore: y\n---\nbody\n";
        let (yaml, body) = split(doc).unwrap();
        assert_eq!(yaml, "title: x\n----\nmore: y");
        assert_eq!(body, "body\n");
    }

    #[test]
    fn split_accepts_trailing_whitespace_on_closing_delimiter() {
        let (yaml, body) = split("---\ntitle: x\n---   \nbody\n").unwrap();
        assert_eq!(yaml, "title: x");
        assert_eq!(body, "body\n");
    }

    #[test]
    fn split_dashed_line_without_real_close_is_missing() {
        let result = split("---\ntitle: x\n---- still open\nbody");
        assert!(matches!(result, Err(FrontMatterError::Missing)));
    }

    #[test]
    fn split_preserves_body_exactly() {
        let doc = "---\ntitle: x\n---\n\n## Heading\n\ntext ---\n";
        let (_, body) = split(doc).unwrap();
        assert_eq!(body, "\n## Heading\n\ntext ---\n");
    }

    // =========================================================================
    // parse / validate tests
    // =========================================================================

    #[test]
    fn parse_valid_front_matter() {
        let (raw, body) = parse(VALID).unwrap();
        assert_eq!(raw.get("title").unwrap().as_str(), Some("Hello World"));
        assert_eq!(body, "Body line.\n");
    }

    #[test]
    fn missing_title_is_reported_by_name() {
        let doc = "---\ncategories: [a]\ntags: [b]\n---\nbody";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField("title")));
    }

    #[test]
    fn missing_tags_is_reported_by_name() {
        let doc = "---\ntitle: x\ncategories: [a]\n---\nbody";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField("tags")));
    }

    #[test]
    fn empty_list_counts_as_missing() {
        let doc = "---\ntitle: x\ncategories: []\ntags: [b]\n---\nbody";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField("categories")));
    }

    #[test]
    fn empty_title_counts_as_missing() {
        let doc = "---\ntitle: \"  \"\ncategories: [a]\ntags: [b]\n---\nbody";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField("title")));
    }

    #[test]
    fn scalar_categories_is_not_a_list() {
        let doc = "---\ntitle: x\ncategories: howto\ntags: [b]\n---\nbody";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAList("categories")));
    }

    #[test]
    fn scalar_tags_is_not_a_list() {
        let doc = "---\ntitle: x\ncategories: [a]\ntags: test\n---\nbody";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAList("tags")));
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let doc = "---\ntitle: [unclosed\n---\nbody";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidYaml(_)));
    }

    #[test]
    fn scalar_front_matter_is_not_a_mapping() {
        let doc = "---\njust a string\n---\nbody";
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAMapping));
    }

    // =========================================================================
    // normalize tests
    // =========================================================================

    #[test]
    fn normalize_fills_defaults() {
        let (raw, _) = parse(VALID).unwrap();
        let fm = raw.normalize(now(), "blog");

        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.date, now());
        assert_eq!(fm.kind, "blog");
        assert!(!fm.draft);
        assert_eq!(fm.categories, vec!["howto"]);
        assert_eq!(fm.tags, vec!["test"]);
    }

    #[test]
    fn normalize_keeps_authored_date() {
        let doc = "---\ntitle: x\ndate: 2025-01-02\ncategories: [a]\ntags: [b]\n---\nbody";
        let (raw, _) = parse(doc).unwrap();
        let fm = raw.normalize(now(), "blog");
        assert_eq!(fm.date, Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn normalize_keeps_authored_timestamp() {
        let doc =
            "---\ntitle: x\ndate: 2025-01-02T10:30:00Z\ncategories: [a]\ntags: [b]\n---\nbody";
        let (raw, _) = parse(doc).unwrap();
        let fm = raw.normalize(now(), "blog");
        assert_eq!(
            fm.date,
            Utc.with_ymd_and_hms(2025, 1, 2, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn normalize_keeps_authored_type_and_draft() {
        let doc = "---\ntitle: x\ntype: essay\ndraft: true\ncategories: [a]\ntags: [b]\n---\nbody";
        let (raw, _) = parse(doc).unwrap();
        let fm = raw.normalize(now(), "blog");
        assert_eq!(fm.kind, "essay");
        assert!(fm.draft);
    }

    #[test]
    fn normalize_carries_unknown_keys() {
        let doc = "---\ntitle: x\ncategories: [a]\ntags: [b]\nsummary: short\n---\nbody";
        let (raw, _) = parse(doc).unwrap();
        let fm = raw.normalize(now(), "blog");
        assert_eq!(fm.extra.get("summary").unwrap().as_str(), Some("short"));
    }

    #[test]
    fn normalize_stringifies_numeric_tags() {
        let doc = "---\ntitle: x\ncategories: [a]\ntags: [2024, rust]\n---\nbody";
        let (raw, _) = parse(doc).unwrap();
        let fm = raw.normalize(now(), "blog");
        assert_eq!(fm.tags, vec!["2024", "rust"]);
    }

    #[test]
    fn normalize_is_deterministic() {
        let (raw, _) = parse(VALID).unwrap();
        let a = raw.normalize(now(), "blog").to_yaml();
        let b = raw.normalize(now(), "blog").to_yaml();
        assert_eq!(a, b);
    }

    #[test]
    fn unparseable_date_falls_back_to_clock() {
        let doc = "---\ntitle: x\ndate: someday\ncategories: [a]\ntags: [b]\n---\nbody";
        let (raw, _) = parse(doc).unwrap();
        let fm = raw.normalize(now(), "blog");
        assert_eq!(fm.date, now());
        // An unparseable date counts as absent for archiving purposes too.
        assert!(!raw.has_authored_date());
    }

    #[test]
    fn authored_date_is_detected() {
        let doc = "---\ntitle: x\ndate: 2025-01-02\ncategories: [a]\ntags: [b]\n---\nbody";
        let (raw, _) = parse(doc).unwrap();
        assert!(raw.has_authored_date());

        let (raw, _) = parse(VALID).unwrap();
        assert!(!raw.has_authored_date());
    }

    // =========================================================================
    // to_yaml tests
    // =========================================================================

    #[test]
    fn to_yaml_writes_hugo_timestamp() {
        let (raw, _) = parse(VALID).unwrap();
        let yaml = raw.normalize(now(), "blog").to_yaml();
        assert!(yaml.contains("date: 2025-03-14T09:26:53Z"));
    }

    #[test]
    fn to_yaml_renames_kind_to_type() {
        let (raw, _) = parse(VALID).unwrap();
        let yaml = raw.normalize(now(), "blog").to_yaml();
        assert!(yaml.contains("type: blog"));
        assert!(!yaml.contains("kind:"));
    }

    #[test]
    fn to_yaml_round_trips_through_parse() {
        let (raw, _) = parse(VALID).unwrap();
        let fm = raw.normalize(now(), "blog");

        let document = format!("---\n{}---\nbody", fm.to_yaml());
        let (raw2, _) = parse(&document).unwrap();
        let fm2 = raw2.normalize(Utc::now(), "blog");

        // The archived copy carries the resolved date, so re-normalizing with
        // a later clock yields the same bytes.
        assert_eq!(fm.to_yaml(), fm2.to_yaml());
    }
}
