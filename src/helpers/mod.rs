//! Helper functions shared by the index, the sitemap feed and the CLI
//!
//! These cover text metrics (reading time, excerpts), date parsing and
//! formatting, and route/URL generation for articles and tag pages.

mod date;
mod text;
mod url;

pub use date::*;
pub use text::*;
pub use url::*;

use chrono::{DateTime, Local};

use crate::config::SiteConfig;

/// Config-bound helpers for building links
pub struct Helpers<'a> {
    config: &'a SiteConfig,
}

impl<'a> Helpers<'a> {
    /// Create a new helpers instance
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Absolute URL of an article
    pub fn article_url(&self, key: &str) -> String {
        full_url_for(self.config, &article_path(self.config, key))
    }

    /// Absolute URL of a tag page
    pub fn tag_url(&self, tag: &str) -> String {
        full_url_for(self.config, &tag_path(self.config, tag))
    }

    /// Human readable date
    pub fn date(&self, date: &DateTime<Local>) -> String {
        full_date(date)
    }
}
