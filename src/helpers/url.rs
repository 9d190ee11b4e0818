//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Join path segments under the site root
///
/// # Examples
/// ```ignore
/// url_for(&["blog", "hello-world"]) // -> "/blog/hello-world"
/// ```
pub fn url_for(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/hello") // -> "https://example.com/blog/hello"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!(
        "{}/{}",
        config.url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Route path of a single article
pub fn article_path(config: &SiteConfig, key: &str) -> String {
    url_for(&[&config.post_dir, key])
}

/// Route segment for a tag page: lower-cased, then percent-encoded
pub fn tag_segment(tag: &str) -> String {
    encode_url(&tag.to_lowercase())
}

/// Route path of a tag page
pub fn tag_path(config: &SiteConfig, tag: &str) -> String {
    url_for(&[&config.tag_dir, &tag_segment(tag)])
}

/// Recover a tag from its route segment
pub fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Encode a URL path segment
pub fn encode_url(path: &str) -> String {
    utf8_percent_encode(path, NON_ALPHANUMERIC).to_string()
}
