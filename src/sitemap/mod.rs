//! Sitemap feed for site-metadata generators

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::SiteConfig;
use crate::content::Article;
use crate::helpers::{article_path, date_only, full_url_for};

/// Bounds applied to author-declared priorities
const MIN_PRIORITY: f32 = 0.1;
const MAX_PRIORITY: f32 = 0.9;

/// Change frequency values of the sitemap protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl FromStr for ChangeFreq {
    type Err = String;

    /// Parse a change frequency, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ChangeFreq::Always),
            "hourly" => Ok(ChangeFreq::Hourly),
            "daily" => Ok(ChangeFreq::Daily),
            "weekly" => Ok(ChangeFreq::Weekly),
            "monthly" => Ok(ChangeFreq::Monthly),
            "yearly" => Ok(ChangeFreq::Yearly),
            "never" => Ok(ChangeFreq::Never),
            other => Err(format!("unknown change frequency '{}'", other)),
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One URL of the sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub key: String,
    pub loc: String,
    pub last_modified: DateTime<Local>,
    pub priority: f32,
    pub change_freq: ChangeFreq,
}

impl SitemapEntry {
    /// Build the entry for an article
    pub fn for_article(article: &Article, config: &SiteConfig) -> Self {
        let priority = article
            .priority
            .filter(|p| p.is_finite())
            .map(|p| p.clamp(MIN_PRIORITY, MAX_PRIORITY))
            .unwrap_or(config.sitemap.default_priority);

        Self {
            key: article.key.clone(),
            loc: full_url_for(config, &article_path(config, &article.key)),
            last_modified: article.last_modified,
            priority,
            change_freq: article
                .change_freq
                .unwrap_or(config.sitemap.default_changefreq),
        }
    }

    fn to_xml(&self) -> String {
        format!(
            "<url><loc>{}</loc><lastmod>{}</lastmod><changefreq>{}</changefreq><priority>{:.1}</priority></url>",
            escape_xml(&self.loc),
            date_only(&self.last_modified),
            self.change_freq,
            self.priority
        )
    }
}

/// Sitemap entries for a listing, in listing order
pub fn feed(articles: &[Article], config: &SiteConfig) -> Vec<SitemapEntry> {
    articles
        .iter()
        .map(|a| SitemapEntry::for_article(a, config))
        .collect()
}

/// Serialize entries as a `urlset` document
pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    for entry in entries {
        xml.push_str(&entry.to_xml());
        xml.push('\n');
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
