//! mdx-index: a content index over a directory of MDX/Markdown articles
//!
//! Articles are plain files with YAML front-matter. The index scans the
//! store, normalizes metadata (reading time, excerpts, tags), and answers
//! listing, tag, related-article and sitemap queries for site renderers.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod sitemap;

use std::path::{Path, PathBuf};

use crate::cache::CachedIndex;
use crate::content::{ContentIndex, IndexOptions};
use crate::error::Result;
use crate::sitemap::SitemapEntry;

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site: configuration plus its content store
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content store directory
    pub content_dir: PathBuf,
}

impl Blog {
    /// Open a site rooted at `base_dir`
    ///
    /// Reads `_config.yml` when present, otherwise uses defaults. The
    /// `MDX_INDEX_URL` environment variable overrides the configured URL.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// A content index over the store
    pub fn index(&self) -> ContentIndex {
        ContentIndex::new(&self.content_dir, IndexOptions::from_config(&self.config))
    }

    /// A content index that caches its listing between calls
    pub fn cached_index(&self) -> CachedIndex {
        CachedIndex::new(self.index())
    }

    /// Sitemap entries for every article, newest first
    pub fn sitemap_feed(&self) -> Result<Vec<SitemapEntry>> {
        let articles = self.index().list_all()?;
        Ok(sitemap::feed(&articles, &self.config))
    }
}
