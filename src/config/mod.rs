//! Configuration module

mod site;

pub use site::ExcerptConfig;
pub use site::HighlightConfig;
pub use site::ReadingConfig;
pub use site::SiteConfig;
pub use site::SitemapConfig;
pub use site::URL_ENV;
