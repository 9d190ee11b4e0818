//! Write the sitemap

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sitemap::render_xml;
use crate::Blog;

/// Render the sitemap and write it to `output`
///
/// Without an output path the file lands in the base directory under the
/// configured sitemap filename. Relative paths resolve against the base dir.
pub fn write(blog: &Blog, output: Option<&Path>) -> Result<PathBuf> {
    let entries = blog.sitemap_feed()?;
    let xml = render_xml(&entries);

    let path = match output {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => blog.base_dir.join(p),
        None => blog.base_dir.join(&blog.config.sitemap.filename),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, xml).with_context(|| format!("Failed to write sitemap to {:?}", path))?;

    tracing::info!("Wrote {} sitemap entries to {:?}", entries.len(), path);
    Ok(path)
}

pub fn run(blog: &Blog, output: Option<&Path>, stdout: bool) -> Result<()> {
    if stdout {
        let entries = blog.sitemap_feed()?;
        print!("{}", render_xml(&entries));
        return Ok(());
    }

    let path = write(blog, output)?;
    println!("Sitemap written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_default_location() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("hello.mdx"),
            "---\ntitle: Hello\ndate: 2024-01-15\nchangeFreq: weekly\n---\nBody",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let path = write(&blog, None).unwrap();
        assert_eq!(path, dir.path().join("sitemap.xml"));

        let xml = fs::read_to_string(path).unwrap();
        assert!(xml.contains("<loc>http://example.com/blog/hello</loc>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.6</priority>"));
    }

    #[test]
    fn test_write_relative_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("content/posts")).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let path = write(&blog, Some(Path::new("public/sitemap.xml"))).unwrap();
        assert_eq!(path, dir.path().join("public/sitemap.xml"));
        assert!(fs::read_to_string(path).unwrap().contains("<urlset"));
    }
}
