//! Article models

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use super::markdown::RenderedBody;
use crate::helpers::ReadingTime;
use crate::sitemap::ChangeFreq;

/// An indexed article
///
/// Articles are built by the index and never mutated afterwards; fields are
/// public for reading only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Store-relative path without extension, used for routing and lookups
    pub key: String,

    /// Article title
    pub title: String,

    /// Subtitle shown below the title and used as the page description
    pub subtitle: String,

    /// Author name
    pub author: String,

    /// Publication date as written in the front-matter
    pub date: String,

    /// Parsed publication date, the listing sort key
    pub published: DateTime<Local>,

    /// Last modification date
    pub last_modified: DateTime<Local>,

    /// Cover image reference
    pub image: Option<String>,

    /// Article tags, in declaration order
    pub tags: Vec<String>,

    /// Author supplied or derived excerpt
    pub excerpt: String,

    /// Estimated reading time
    pub reading_time: ReadingTime,

    /// Category (explicit, or the first tag)
    pub category: Option<String>,

    /// Whether the article is featured
    pub featured: bool,

    /// Sitemap priority declared by the author
    pub priority: Option<f32>,

    /// Sitemap change frequency declared by the author
    pub change_freq: Option<ChangeFreq>,

    /// Source file path
    #[serde(skip)]
    pub source: PathBuf,

    /// Custom front-matter fields
    #[serde(skip)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Article {
    /// Whether the article carries `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Whether the article shares at least one tag with `tags`, as written
    pub fn shares_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }

    /// Get the previous (newer) article in a listing
    pub fn prev<'a>(&self, articles: &'a [Article]) -> Option<&'a Article> {
        let pos = articles.iter().position(|a| a.key == self.key)?;
        if pos > 0 {
            Some(&articles[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) article in a listing
    pub fn next<'a>(&self, articles: &'a [Article]) -> Option<&'a Article> {
        let pos = articles.iter().position(|a| a.key == self.key)?;
        articles.get(pos + 1)
    }
}

/// An article together with its resolved body
#[derive(Debug, Clone, Serialize)]
pub struct RenderedArticle {
    #[serde(flatten)]
    pub article: Article,

    /// Rendered body payload
    pub body: RenderedBody,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Build an article with the fields the query tests care about
    pub fn article(key: &str, tags: &[&str], day: u32) -> Article {
        let published = Local.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        Article {
            key: key.to_string(),
            title: key.to_uppercase(),
            subtitle: String::new(),
            author: "Tester".to_string(),
            date: published.format("%Y-%m-%d").to_string(),
            published,
            last_modified: published,
            image: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            excerpt: String::new(),
            reading_time: ReadingTime::estimate("", 200),
            category: None,
            featured: false,
            priority: None,
            change_freq: None,
            source: PathBuf::from(format!("{}.mdx", key)),
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::article;

    #[test]
    fn test_has_tag_ignores_case() {
        let a = article("a", &["Rust", "MDX"], 1);
        assert!(a.has_tag("rust"));
        assert!(a.has_tag("mdx"));
        assert!(!a.has_tag("go"));
    }

    #[test]
    fn test_shares_tag_is_exact() {
        let a = article("a", &["Rust"], 1);
        assert!(a.shares_tag(&["Rust".to_string(), "Go".to_string()]));
        assert!(!a.shares_tag(&["rust".to_string()]));
    }

    #[test]
    fn test_prev_next() {
        let list = vec![article("c", &[], 3), article("b", &[], 2), article("a", &[], 1)];
        assert_eq!(list[1].prev(&list).map(|a| a.key.as_str()), Some("c"));
        assert_eq!(list[1].next(&list).map(|a| a.key.as_str()), Some("a"));
        assert!(list[0].prev(&list).is_none());
        assert!(list[2].next(&list).is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let a = article("hello", &["x"], 5);
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["key"], "hello");
        assert_eq!(json["readingTime"], "1 min read");
        assert!(json.get("lastModified").is_some());
        assert!(json.get("source").is_none());
    }
}
