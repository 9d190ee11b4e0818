//! Tag listing and tag filtering

use anyhow::Result;

use super::list::summary_line;
use crate::helpers::Helpers;
use crate::Blog;

/// Print every tag with its article count and page URL
pub fn list(blog: &Blog) -> Result<()> {
    let counts = blog.index().tag_counts()?;
    let helpers = Helpers::new(&blog.config);

    println!("Tags ({}):", counts.len());
    for (tag, count) in &counts {
        println!("  {} ({}) {}", tag, count, helpers.tag_url(tag));
    }

    Ok(())
}

/// Print the articles carrying `tag`
pub fn filter(blog: &Blog, tag: &str) -> Result<()> {
    let articles = blog.index().filter_by_tag(tag)?;

    if articles.is_empty() {
        println!("No articles tagged '{}'", tag);
        return Ok(());
    }

    println!("Tagged '{}' ({}):", tag, articles.len());
    for article in &articles {
        println!("  {}", summary_line(article));
    }

    Ok(())
}
