//! Show a single article

use anyhow::Result;

use crate::content::RenderedArticle;
use crate::error::ContentError;
use crate::helpers::Helpers;
use crate::Blog;

/// Load an article by key, failing when it does not exist
pub fn load(blog: &Blog, key: &str) -> Result<RenderedArticle> {
    let found = blog.index().get_by_key(key)?;
    found.ok_or_else(|| ContentError::NotFound(key.to_string()).into())
}

/// Print an article's metadata and rendered body
pub fn run(blog: &Blog, key: &str, json: bool) -> Result<()> {
    let rendered = load(blog, key)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    let helpers = Helpers::new(&blog.config);
    let article = &rendered.article;

    println!("{}", article.title);
    if !article.subtitle.is_empty() {
        println!("{}", article.subtitle);
    }
    println!();
    println!("  Key:       {}", article.key);
    println!("  URL:       {}", helpers.article_url(&article.key));
    println!("  Author:    {}", article.author);
    println!("  Published: {}", helpers.date(&article.published));
    println!("  Updated:   {}", helpers.date(&article.last_modified));
    println!("  Reading:   {}", article.reading_time);
    if !article.tags.is_empty() {
        println!("  Tags:      {}", article.tags.join(", "));
    }
    if let Some(category) = &article.category {
        println!("  Category:  {}", category);
    }
    if !rendered.body.components.is_empty() {
        println!("  Components: {}", rendered.body.components.join(", "));
    }

    if let Some(adjacent) = blog.index().adjacent(&article.key)? {
        if let Some(prev) = &adjacent.prev {
            println!("  Newer:     {} [{}]", prev.title, prev.key);
        }
        if let Some(next) = &adjacent.next {
            println!("  Older:     {} [{}]", next.title, next.key);
        }
    }

    if !rendered.body.toc.is_empty() {
        println!();
        println!("Contents:");
        for entry in &rendered.body.toc {
            let indent = "  ".repeat(entry.level.saturating_sub(1));
            println!("  {}{} (#{})", indent, entry.text, entry.id);
        }
    }

    println!();
    println!("{}", rendered.body.html);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_missing_article_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("content/posts")).unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let err = load(&blog, "nope").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::NotFound(key)) if key == "nope"
        ));
    }

    #[test]
    fn test_load_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("hello.mdx"), "---\ntitle: Hello\n---\n# Hi\n").unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let rendered = load(&blog, "hello.mdx").unwrap();
        assert_eq!(rendered.article.title, "Hello");
        assert_eq!(rendered.body.toc.len(), 1);
    }
}
