//! Content module - article loading, rendering and queries

mod article;
mod frontmatter;
mod index;
mod markdown;
pub mod query;

pub use article::{Article, RenderedArticle};
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use index::{ContentIndex, IndexOptions, DEFAULT_RELATED_LIMIT};
pub use markdown::{strip_esm, MarkdownRenderer, RenderedBody, TocEntry};
pub use query::Adjacent;
