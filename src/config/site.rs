//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ContentError, Result};
use crate::sitemap::ChangeFreq;

/// Environment variable overriding the configured site URL
pub const URL_ENV: &str = "MDX_INDEX_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub post_dir: String,
    pub tag_dir: String,

    // Content store
    pub content_dir: String,
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub default_image: Option<String>,

    // Derived fields
    #[serde(default)]
    pub excerpt: ExcerptConfig,
    #[serde(default)]
    pub reading: ReadingConfig,
    pub related_posts: usize,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Sitemap
    #[serde(default)]
    pub sitemap: SitemapConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: "Anonymous".to_string(),

            url: "http://example.com".to_string(),
            post_dir: "blog".to_string(),
            tag_dir: "tag".to_string(),

            content_dir: "content/posts".to_string(),
            extensions: vec!["mdx".to_string(), "md".to_string()],
            exclude: Vec::new(),
            default_image: None,

            excerpt: ExcerptConfig::default(),
            reading: ReadingConfig::default(),
            related_posts: crate::content::DEFAULT_RELATED_LIMIT,

            highlight: HighlightConfig::default(),
            sitemap: SitemapConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_error = |reason: String| ContentError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|e| config_error(e.to_string()))?;
        config.validate().map_err(config_error)?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Using site url from {}: {}", URL_ENV, url);
                self.url = url;
            }
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.extensions.is_empty() {
            return Err("`extensions` must list at least one file extension".to_string());
        }
        if self.reading.words_per_minute == 0 {
            return Err("`reading.words_per_minute` must be greater than zero".to_string());
        }
        for pattern in &self.exclude {
            glob::Pattern::new(pattern)
                .map_err(|e| format!("invalid exclude pattern '{}': {}", pattern, e))?;
        }
        Ok(())
    }
}

/// Excerpt derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcerptConfig {
    /// Number of characters taken from the body
    pub length: usize,
    /// Appended after the truncated body
    pub marker: String,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            length: 200,
            marker: "...".to_string(),
        }
    }
}

/// Reading time estimation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// Sitemap feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub filename: String,
    pub default_priority: f32,
    pub default_changefreq: ChangeFreq,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            filename: "sitemap.xml".to_string(),
            default_priority: 0.6,
            default_changefreq: ChangeFreq::Monthly,
        }
    }
}
