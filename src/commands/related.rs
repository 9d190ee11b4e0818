//! Related articles for a given article

use anyhow::Result;

use super::list::summary_line;
use crate::content::{query, Article};
use crate::error::ContentError;
use crate::Blog;

/// Articles related to `key` through its own tags
pub fn find(blog: &Blog, key: &str, limit: usize) -> Result<Vec<Article>> {
    let index = blog.index();
    let articles = index.list_all()?;
    let lookup = index.lookup_key(key);

    let article = articles
        .iter()
        .find(|a| a.key == lookup)
        .ok_or_else(|| ContentError::NotFound(key.to_string()))?;

    Ok(query::related(&articles, &article.key, &article.tags, limit))
}

pub fn run(blog: &Blog, key: &str, limit: usize) -> Result<()> {
    let related = find(blog, key, limit)?;

    println!("Related to '{}' ({}):", key, related.len());
    for article in &related {
        println!("  {}", summary_line(article));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_uses_article_tags() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        for (name, date, tags) in [
            ("a", "2024-01-01", "x"),
            ("b", "2024-02-01", "x, y"),
            ("c", "2024-03-01", "y"),
            ("d", "2024-04-01", "z"),
        ] {
            let content = format!("---\ntitle: {}\ndate: {}\ntags: [{}]\n---\nBody", name, date, tags);
            fs::write(posts.join(format!("{}.mdx", name)), content).unwrap();
        }

        let blog = Blog::new(dir.path()).unwrap();
        let keys: Vec<String> = find(&blog, "c.mdx", 3)
            .unwrap()
            .into_iter()
            .map(|a| a.key)
            .collect();
        assert_eq!(keys, vec!["b", "d", "a"]);

        assert!(find(&blog, "missing", 3).is_err());
    }
}
