//! Content index - loads articles from the content store and answers queries

use chrono::{DateTime, Local};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::query::{self, Adjacent};
use super::{Article, FrontMatter, MarkdownRenderer, RenderedArticle};
use crate::config::SiteConfig;
use crate::error::{ContentError, Result};
use crate::helpers::{date_only, derive_excerpt, parse_date_string, ReadingTime};

/// Number of related articles returned when the caller has no preference
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Settings controlling how files become articles
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Recognized content file extensions, without the dot
    pub extensions: Vec<String>,
    /// Store-relative paths matching any of these are ignored
    pub exclude: Vec<glob::Pattern>,
    pub excerpt_length: usize,
    pub excerpt_marker: String,
    pub words_per_minute: usize,
    pub default_author: String,
    pub default_image: Option<String>,
    pub highlight_theme: String,
    pub line_numbers: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl IndexOptions {
    /// Build index options from the site configuration
    pub fn from_config(config: &SiteConfig) -> Self {
        let exclude = config
            .exclude
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Ignoring invalid exclude pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();

        Self {
            extensions: config.extensions.clone(),
            exclude,
            excerpt_length: config.excerpt.length,
            excerpt_marker: config.excerpt.marker.clone(),
            words_per_minute: config.reading.words_per_minute,
            default_author: config.author.clone(),
            default_image: config.default_image.clone(),
            highlight_theme: config.highlight.theme.clone(),
            line_numbers: config.highlight.line_number,
        }
    }
}

/// Content index over a directory of article files
///
/// The index keeps no article state: every query rescans and reparses the
/// store, so results always reflect the files on disk.
#[derive(Debug, Clone)]
pub struct ContentIndex {
    content_dir: PathBuf,
    options: IndexOptions,
}

impl ContentIndex {
    /// Create a new content index
    pub fn new<P: Into<PathBuf>>(content_dir: P, options: IndexOptions) -> Self {
        Self {
            content_dir: content_dir.into(),
            options,
        }
    }

    /// Directory holding the article files
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Load every article, newest first
    ///
    /// Files that fail to parse are logged and skipped. A missing or
    /// unreadable store, or two files sharing a key, fail the whole listing.
    pub fn list_all(&self) -> Result<Vec<Article>> {
        let files = self.scan()?;
        let mut articles = Vec::with_capacity(files.len());

        for (key, path) in files {
            match self.load_article(&key, &path) {
                Ok((article, _)) => articles.push(article),
                Err(e) => {
                    tracing::warn!("Skipping article {:?}: {}", path, e);
                }
            }
        }

        // Stable sort: equal dates keep scan order
        articles.sort_by(|a, b| b.published.cmp(&a.published));

        tracing::debug!(
            "Indexed {} articles from {:?}",
            articles.len(),
            self.content_dir
        );
        Ok(articles)
    }

    /// Fetch a single article with its rendered body
    ///
    /// Accepts a key (`hello`) or a file name (`hello.mdx`). Returns
    /// `Ok(None)` when nothing matches.
    pub fn get_by_key(&self, key: &str) -> Result<Option<RenderedArticle>> {
        self.ensure_store()?;

        let Some(key) = normalize_key(key, &self.options.extensions) else {
            return Ok(None);
        };
        let Some(path) = self.locate(&key)? else {
            return Ok(None);
        };

        let (article, body) = self.load_article(&key, &path)?;
        let renderer = MarkdownRenderer::with_options(
            &self.options.highlight_theme,
            self.options.line_numbers,
        );
        let body = renderer.render(&body)?;

        tracing::debug!("Rendered article {} ({} headings)", key, body.toc.len());
        Ok(Some(RenderedArticle { article, body }))
    }

    /// Articles tagged with `tag`, ignoring case
    pub fn filter_by_tag(&self, tag: &str) -> Result<Vec<Article>> {
        Ok(query::filter_by_tag(&self.list_all()?, tag))
    }

    /// Every tag used in the store, without duplicates
    pub fn list_all_tags(&self) -> Result<IndexSet<String>> {
        Ok(query::collect_tags(&self.list_all()?))
    }

    /// Up to `limit` articles related to `key` through `tags`
    pub fn related_to(&self, key: &str, tags: &[String], limit: usize) -> Result<Vec<Article>> {
        let key = self.lookup_key(key);
        Ok(query::related(&self.list_all()?, &key, tags, limit))
    }

    /// The `n` most recent articles
    pub fn newest(&self, n: usize) -> Result<Vec<Article>> {
        let mut articles = self.list_all()?;
        articles.truncate(n);
        Ok(articles)
    }

    /// Article count per tag, most used first
    pub fn tag_counts(&self) -> Result<IndexMap<String, usize>> {
        Ok(query::count_tags(&self.list_all()?))
    }

    /// Route segments of all tag pages
    pub fn tag_routes(&self) -> Result<IndexSet<String>> {
        Ok(query::tag_routes(&self.list_all()?))
    }

    /// Newer and older neighbours of `key`
    pub fn adjacent(&self, key: &str) -> Result<Option<Adjacent>> {
        let key = self.lookup_key(key);
        Ok(query::adjacent(&self.list_all()?, &key))
    }

    /// Key used to compare against listed articles
    pub(crate) fn lookup_key(&self, key: &str) -> String {
        normalize_key(key, &self.options.extensions).unwrap_or_else(|| key.to_string())
    }

    fn ensure_store(&self) -> Result<()> {
        let metadata =
            fs::metadata(&self.content_dir).map_err(|e| ContentError::store(&self.content_dir, e))?;
        if !metadata.is_dir() {
            let e = std::io::Error::other("not a directory");
            return Err(ContentError::store(&self.content_dir, e));
        }
        Ok(())
    }

    /// Collect `(key, path)` pairs for every content file in the store
    pub(crate) fn scan(&self) -> Result<Vec<(String, PathBuf)>> {
        self.ensure_store()?;
        fs::read_dir(&self.content_dir).map_err(|e| ContentError::store(&self.content_dir, e))?;

        let mut files = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        let walker = WalkDir::new(&self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.content_dir, e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(key) = self.key_for(path) else {
                continue;
            };

            if let Some(first) = seen.get(&key) {
                return Err(ContentError::DuplicateKey {
                    key,
                    first: first.clone(),
                    second: path.to_path_buf(),
                });
            }
            seen.insert(key.clone(), path.to_path_buf());
            files.push((key, path.to_path_buf()));
        }

        Ok(files)
    }

    /// Key of a content file, or `None` when the file is not indexed
    fn key_for(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?;
        if !self.options.extensions.iter().any(|e| e == ext) {
            return None;
        }

        let relative = path.strip_prefix(&self.content_dir).ok()?;
        if self.options.exclude.iter().any(|p| p.matches_path(relative)) {
            tracing::debug!("Excluded {:?}", relative);
            return None;
        }

        let relative = relative.with_extension("");
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?
            .join("/");

        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// Find the file for a normalized key
    fn locate(&self, key: &str) -> Result<Option<PathBuf>> {
        let mut found: Option<PathBuf> = None;

        for ext in &self.options.extensions {
            let path = self.content_dir.join(format!("{}.{}", key, ext));
            if !path.is_file() {
                continue;
            }
            // Hidden or excluded files are not part of the index
            if key.split('/').any(|s| is_hidden(OsStr::new(s))) {
                continue;
            }
            if self.key_for(&path).as_deref() != Some(key) {
                continue;
            }

            if let Some(first) = found {
                return Err(ContentError::DuplicateKey {
                    key: key.to_string(),
                    first,
                    second: path,
                });
            }
            found = Some(path);
        }

        Ok(found)
    }

    /// Read and normalize one article, returning it with its raw body
    fn load_article(&self, key: &str, path: &Path) -> Result<(Article, String)> {
        let content = fs::read_to_string(path).map_err(|e| ContentError::parse(path, e))?;
        let (fm, body) = FrontMatter::parse(&content).map_err(|e| ContentError::parse(path, e))?;

        let file_modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(Local::now);

        let (date, published) = match fm.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match parse_date_string(raw) {
                Some(published) => (raw.to_string(), published),
                None => {
                    tracing::warn!(
                        "Unparseable date {:?} in {:?}, using file modification time",
                        raw,
                        path
                    );
                    (raw.to_string(), file_modified)
                }
            },
            _ => (date_only(&file_modified), file_modified),
        };

        let last_modified = match fm.last_modified.as_deref() {
            Some(raw) => parse_date_string(raw).unwrap_or_else(|| {
                tracing::debug!("Unparseable lastModified {:?} in {:?}", raw, path);
                file_modified
            }),
            None => file_modified,
        };

        let title = non_empty(fm.title).unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let excerpt = non_empty(fm.excerpt).unwrap_or_else(|| {
            derive_excerpt(
                body,
                self.options.excerpt_length,
                &self.options.excerpt_marker,
            )
        });

        let category = non_empty(fm.category).or_else(|| fm.tags.first().cloned());

        let article = Article {
            key: key.to_string(),
            title,
            subtitle: fm.subtitle.unwrap_or_default(),
            author: non_empty(fm.author).unwrap_or_else(|| self.options.default_author.clone()),
            date,
            published,
            last_modified,
            image: non_empty(fm.image).or_else(|| self.options.default_image.clone()),
            tags: fm.tags,
            excerpt,
            reading_time: ReadingTime::estimate(body, self.options.words_per_minute),
            category,
            featured: fm.featured,
            priority: fm.priority,
            change_freq: fm.change_freq,
            source: path.to_path_buf(),
            extra: fm.extra,
        };

        Ok((article, body.to_string()))
    }
}

/// Normalize a lookup key: `/`-separated, no extension, no traversal
fn normalize_key(key: &str, extensions: &[String]) -> Option<String> {
    let key = key.trim().replace('\\', "/");
    let mut key = key.trim_matches('/').to_string();

    for ext in extensions {
        if let Some(stripped) = key.strip_suffix(&format!(".{}", ext)) {
            key = stripped.to_string();
            break;
        }
    }

    if key.is_empty() {
        return None;
    }

    let safe = Path::new(&key)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Some(key)
    } else {
        None
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
