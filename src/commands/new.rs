//! Scaffold a new article

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Create a new `.mdx` article in the content store
///
/// The file name is the slugified title. Existing files are never
/// overwritten.
pub fn create_article(blog: &Blog, title: &str, tags: &[String]) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable file name", title);
    }

    let file_path = blog.content_dir.join(format!("{}.mdx", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(&blog.content_dir)?;

    let now = chrono::Local::now();
    let tags = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| serde_json::to_string(t))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let content = format!(
        "---\ntitle: {}\ndate: {}\nauthor: {}\ntags: [{}]\n---\n\n",
        serde_json::to_string(title)?,
        now.format("%Y-%m-%d %H:%M:%S"),
        serde_json::to_string(&blog.config.author)?,
        tags.join(", ")
    );

    fs::write(&file_path, content)?;
    tracing::debug!("Created {:?}", file_path);

    Ok(file_path)
}

pub fn run(blog: &Blog, title: &str, tags: &[String]) -> Result<()> {
    let path = create_article(blog, title, tags)?;
    println!("Created: {:?}", path);
    Ok(())
}
