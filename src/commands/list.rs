//! List indexed articles

use anyhow::Result;

use crate::content::Article;
use crate::helpers::date_only;
use crate::Blog;

/// Print every article, or the `limit` newest, newest first
pub fn run(blog: &Blog, limit: Option<usize>, json: bool) -> Result<()> {
    let index = blog.index();
    let articles = match limit {
        Some(n) => index.newest(n)?,
        None => index.list_all()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    println!("Articles ({}):", articles.len());
    for article in &articles {
        println!("  {}", summary_line(article));
    }

    Ok(())
}

/// One-line summary used by the listing commands
pub(crate) fn summary_line(article: &Article) -> String {
    let mut line = format!(
        "{} - {} [{}] ({})",
        date_only(&article.published),
        article.title,
        article.key,
        article.reading_time
    );
    if !article.tags.is_empty() {
        line.push_str(&format!(" #{}", article.tags.join(" #")));
    }
    line
}
