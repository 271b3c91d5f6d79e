//! Site configuration.
//!
//! Configuration lives in an optional `draftpress.toml` at the site root.
//! Every field has a default matching a stock Hugo layout, so most sites
//! need no config file at all. Unknown keys are rejected so typos fail
//! loudly instead of being silently ignored.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional config file at the site root.
pub const CONFIG_FILENAME: &str = "draftpress.toml";

/// Files whose presence marks a directory as a Hugo site root.
const SITE_MARKERS: [&str; 3] = ["hugo.toml", "hugo.yaml", "config.toml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("No Hugo site found (looked for hugo.toml or config.toml in the current directory and its ancestors)")]
    SiteRootNotFound,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where content files land, relative to the site root.
    pub content_dir: String,
    /// Where image assets land, relative to the site root.
    pub static_dir: String,
    /// Site-absolute URL prefix image refs are rewritten to.
    pub url_prefix: String,
    /// Directory name drafts are archived into after publishing.
    pub archive_dir: String,
    pub images: ImagesConfig,
    pub front_matter: FrontMatterConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "content/blog".to_string(),
            static_dir: "static/images/blog".to_string(),
            url_prefix: "/images/blog".to_string(),
            archive_dir: "published".to_string(),
            images: ImagesConfig::default(),
            front_matter: FrontMatterConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Images wider than this are resized down to it.
    pub max_width: u32,
    /// JPEG re-encode quality (1-100).
    pub jpeg_quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            jpeg_quality: 85,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontMatterConfig {
    /// Value written to the `type` field when the draft has none.
    pub kind: String,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            kind: "blog".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content_dir cannot be empty".to_string(),
            ));
        }
        if self.static_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "static_dir cannot be empty".to_string(),
            ));
        }
        if !self.url_prefix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "url_prefix must start with '/', got '{}'",
                self.url_prefix
            )));
        }
        if self.archive_dir.trim().is_empty() || self.archive_dir.contains('/') {
            return Err(ConfigError::Validation(format!(
                "archive_dir must be a plain directory name, got '{}'",
                self.archive_dir
            )));
        }
        if self.images.max_width == 0 {
            return Err(ConfigError::Validation(
                "images.max_width must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.images.jpeg_quality) {
            return Err(ConfigError::Validation(format!(
                "images.jpeg_quality must be 1-100, got {}",
                self.images.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Load `draftpress.toml` from the site root, falling back to defaults when
/// the file does not exist.
pub fn load_config(site_root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = site_root.join(CONFIG_FILENAME);
    let config = if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Walk up from `start` looking for a Hugo site marker file.
pub fn find_site_root(start: &Path) -> Result<PathBuf, ConfigError> {
    for dir in start.ancestors() {
        if SITE_MARKERS.iter().any(|m| dir.join(m).is_file()) {
            return Ok(dir.to_path_buf());
        }
    }
    Err(ConfigError::SiteRootNotFound)
}

/// Stock config file with every option at its default, commented out.
pub fn stock_config_toml() -> String {
    r#"# draftpress configuration.
# Every value shown is the default; uncomment to override.

# Where content files land, relative to the site root.
# content_dir = "content/blog"

# Where image assets land, relative to the site root.
# static_dir = "static/images/blog"

# Site-absolute URL prefix image refs are rewritten to.
# url_prefix = "/images/blog"

# Directory name drafts are archived into after publishing.
# archive_dir = "published"

[images]
# Images wider than this are resized down to it.
# max_width = 1920

# JPEG re-encode quality (1-100).
# jpeg_quality = 85

[front_matter]
# Value written to the `type` field when the draft has none.
# kind = "blog"
"#
    .to_string()
}
