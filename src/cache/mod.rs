//! Snapshot cache for the content index
//!
//! Keeps the last listing in memory together with a fingerprint of the
//! store. The fingerprint covers every indexed file's path, size and
//! modification time, so adding, removing or touching a file triggers a
//! rebuild on the next call.

use indexmap::IndexSet;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

use crate::content::{query, Article, ContentIndex};
use crate::error::Result;

/// Content index with a fingerprint-invalidated listing cache
#[derive(Debug)]
pub struct CachedIndex {
    index: ContentIndex,
    snapshot: Option<Snapshot>,
}

#[derive(Debug)]
struct Snapshot {
    fingerprint: u64,
    articles: Vec<Article>,
}

impl CachedIndex {
    pub fn new(index: ContentIndex) -> Self {
        Self {
            index,
            snapshot: None,
        }
    }

    /// The wrapped index
    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    /// Listing, rebuilt only when the store changed since the last call
    pub fn list_all(&mut self) -> Result<&[Article]> {
        let fingerprint = self.fingerprint()?;

        let fresh = matches!(&self.snapshot, Some(s) if s.fingerprint == fingerprint);
        if !fresh {
            tracing::debug!("Content store changed, rebuilding listing");
            let articles = self.index.list_all()?;
            self.snapshot = Some(Snapshot {
                fingerprint,
                articles,
            });
        }

        Ok(self
            .snapshot
            .as_ref()
            .map(|s| s.articles.as_slice())
            .unwrap_or_default())
    }

    /// Drop the cached listing
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Whether a listing is currently cached
    pub fn is_cached(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn filter_by_tag(&mut self, tag: &str) -> Result<Vec<Article>> {
        Ok(query::filter_by_tag(self.list_all()?, tag))
    }

    pub fn list_all_tags(&mut self) -> Result<IndexSet<String>> {
        Ok(query::collect_tags(self.list_all()?))
    }

    pub fn related_to(&mut self, key: &str, tags: &[String], limit: usize) -> Result<Vec<Article>> {
        let key = self.index.lookup_key(key);
        Ok(query::related(self.list_all()?, &key, tags, limit))
    }

    /// Hash of path, size and mtime of every indexed file
    fn fingerprint(&self) -> Result<u64> {
        let mut hasher = DefaultHasher::new();

        for (key, path) in self.index.scan()? {
            key.hash(&mut hasher);
            if let Ok(metadata) = fs::metadata(&path) {
                metadata.len().hash(&mut hasher);
                let mtime = metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
                    .unwrap_or_default();
                mtime.as_nanos().hash(&mut hasher);
            }
        }

        Ok(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::IndexOptions;
    use std::path::Path;

    fn write_post(dir: &Path, name: &str, date: &str, tags: &str) {
        let content = format!("---\ntitle: {}\ndate: {}\ntags: [{}]\n---\nBody of {}.", name, date, tags, name);
        fs::write(dir.join(name), content).unwrap();
    }

    fn keys(articles: &[Article]) -> Vec<String> {
        articles.iter().map(|a| a.key.clone()).collect()
    }

    #[test]
    fn test_reuses_snapshot_until_store_changes() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.mdx", "2024-01-01", "x");
        write_post(dir.path(), "b.mdx", "2024-02-01", "x, y");

        let mut cached = CachedIndex::new(ContentIndex::new(dir.path(), IndexOptions::default()));
        assert!(!cached.is_cached());
        assert_eq!(keys(cached.list_all().unwrap()), vec!["b", "a"]);
        assert!(cached.is_cached());

        let first = cached.fingerprint().unwrap();
        assert_eq!(first, cached.fingerprint().unwrap());

        write_post(dir.path(), "c.mdx", "2024-03-01", "y");
        assert_ne!(first, cached.fingerprint().unwrap());
        assert_eq!(keys(cached.list_all().unwrap()), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_rebuilds_after_removal() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.mdx", "2024-01-01", "x");
        write_post(dir.path(), "b.mdx", "2024-02-01", "y");

        let mut cached = CachedIndex::new(ContentIndex::new(dir.path(), IndexOptions::default()));
        assert_eq!(cached.list_all().unwrap().len(), 2);

        fs::remove_file(dir.path().join("b.mdx")).unwrap();
        assert_eq!(keys(cached.list_all().unwrap()), vec!["a"]);
    }

    #[test]
    fn test_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.mdx", "2024-01-01", "x");

        let mut cached = CachedIndex::new(ContentIndex::new(dir.path(), IndexOptions::default()));
        cached.list_all().unwrap();
        cached.invalidate();
        assert!(!cached.is_cached());
        assert_eq!(cached.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_queries_match_uncached_index() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "a.mdx", "2024-01-01", "x");
        write_post(dir.path(), "b.mdx", "2024-02-01", "x, y");
        write_post(dir.path(), "c.mdx", "2024-03-01", "y");

        let index = ContentIndex::new(dir.path(), IndexOptions::default());
        let mut cached = CachedIndex::new(index.clone());

        assert_eq!(cached.filter_by_tag("Y").unwrap(), index.filter_by_tag("Y").unwrap());
        assert_eq!(cached.list_all_tags().unwrap(), index.list_all_tags().unwrap());
        let tags = vec!["y".to_string()];
        assert_eq!(
            keys(&cached.related_to("c.mdx", &tags, 3).unwrap()),
            vec!["b", "a"]
        );
    }

    #[test]
    fn test_missing_store_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let index = ContentIndex::new(dir.path().join("nope"), IndexOptions::default());
        let mut cached = CachedIndex::new(index);
        assert!(cached.list_all().is_err());
    }
}
