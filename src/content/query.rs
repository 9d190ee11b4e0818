//! Read-only queries over a listing
//!
//! Every function here takes a listing already sorted newest first, as
//! produced by [`ContentIndex::list_all`](super::ContentIndex::list_all), and
//! keeps that order in its output.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::Article;
use crate::helpers::tag_segment;

/// Articles carrying `tag`, compared case-insensitively
pub fn filter_by_tag(articles: &[Article], tag: &str) -> Vec<Article> {
    articles.iter().filter(|a| a.has_tag(tag)).cloned().collect()
}

/// Union of all tags, deduplicated case-sensitively
pub fn collect_tags(articles: &[Article]) -> IndexSet<String> {
    articles
        .iter()
        .flat_map(|a| a.tags.iter().cloned())
        .collect()
}

/// Number of articles per tag, most used first
///
/// A tag declared twice on one article counts once for that article.
pub fn count_tags(articles: &[Article]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for article in articles {
        let unique: IndexSet<&String> = article.tags.iter().collect();
        for tag in unique {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

/// Route segments for every tag page
///
/// Tags differing only in case share one page.
pub fn tag_routes(articles: &[Article]) -> IndexSet<String> {
    articles
        .iter()
        .flat_map(|a| a.tags.iter())
        .map(|t| tag_segment(t))
        .collect()
}

/// Articles related to `key`
///
/// Articles sharing a tag with `tags` come first, in listing order. When
/// fewer than `limit` match, the newest remaining articles fill the gap.
/// `key` itself is never included and no article appears twice.
pub fn related(articles: &[Article], key: &str, tags: &[String], limit: usize) -> Vec<Article> {
    let candidates = || articles.iter().filter(|a| a.key != key);

    let mut selected: Vec<&Article> = candidates()
        .filter(|a| a.shares_tag(tags))
        .take(limit)
        .collect();

    if selected.len() < limit {
        let missing = limit - selected.len();
        let backfill: Vec<&Article> = candidates()
            .filter(|a| !selected.iter().any(|s| s.key == a.key))
            .take(missing)
            .collect();
        selected.extend(backfill);
    }

    selected.into_iter().cloned().collect()
}

/// Neighbours of an article in the listing
#[derive(Debug, Clone, Serialize)]
pub struct Adjacent {
    /// Newer article
    pub prev: Option<Article>,
    /// Older article
    pub next: Option<Article>,
}

/// Find the neighbours of `key`, or `None` when `key` is not listed
pub fn adjacent(articles: &[Article], key: &str) -> Option<Adjacent> {
    let current = articles.iter().find(|a| a.key == key)?;
    Some(Adjacent {
        prev: current.prev(articles).cloned(),
        next: current.next(articles).cloned(),
    })
}
