//! MDX body rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::error::{ContentError, Result};

lazy_static! {
    /// Top-level MDX module statements
    static ref ESM_LINE: Regex = Regex::new(r"^(import|export)\s").unwrap();
    /// Capitalized JSX element names, including member expressions like `Tabs.Item`
    static ref COMPONENT_TAG: Regex =
        Regex::new(r"<([A-Z][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)[\s/>]").unwrap();
}

/// A heading collected for the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: usize,
    pub id: String,
    pub text: String,
}

/// A fully resolved article body
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedBody {
    /// Rendered HTML, with embedded components passed through verbatim
    pub html: String,
    /// Headings in document order
    pub toc: Vec<TocEntry>,
    /// Names of embedded components, first occurrence order
    pub components: Vec<String>,
}

/// MDX renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render an MDX body
    pub fn render(&self, source: &str) -> Result<RenderedBody> {
        let markdown = strip_esm(source);

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(&markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut toc: Vec<TocEntry> = Vec::new();
        let mut components: Vec<String> = Vec::new();

        let mut code_block: Option<(Option<String>, String)> = None;
        let mut heading: Option<(usize, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            // Info strings may carry meta after the language
                            let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(Tag::Heading { .. }) => {
                    heading = Some((events.len(), String::new()));
                    events.push(event);
                }
                Event::End(TagEnd::Heading(level)) => {
                    if let Some((start, text)) = heading.take() {
                        let entry = heading_entry(&mut events, start, level as usize, text, &toc);
                        toc.push(entry);
                    }
                    events.push(event);
                }
                Event::Text(ref text) | Event::Code(ref text) if heading.is_some() => {
                    if let Some((_, buf)) = heading.as_mut() {
                        buf.push_str(text);
                    }
                    events.push(event);
                }
                Event::Html(ref raw) | Event::InlineHtml(ref raw) => {
                    for cap in COMPONENT_TAG.captures_iter(raw) {
                        let name = cap[1].to_string();
                        if !components.contains(&name) {
                            components.push(name);
                        }
                    }
                    events.push(event);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(RenderedBody {
            html: html_output,
            toc,
            components,
        })
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String> {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
            .ok_or_else(|| ContentError::Render("no highlighting themes available".to_string()))?;

        let html = match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Ok(highlighted) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang, highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    html_escape(code)
                )
            }
        };
        Ok(html)
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");
        let code_lines = lines.join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang, gutter, code_lines
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Give the heading starting at `events[start]` an anchor and build its TOC entry
fn heading_entry(
    events: &mut [Event],
    start: usize,
    level: usize,
    text: String,
    existing: &[TocEntry],
) -> TocEntry {
    let text = text.trim().to_string();
    let mut id = String::new();

    if let Some(Event::Start(Tag::Heading { id: explicit, .. })) = events.get_mut(start) {
        match explicit {
            Some(explicit) => id = explicit.to_string(),
            None => {
                let base = if text.is_empty() {
                    "section".to_string()
                } else {
                    slug::slugify(&text)
                };
                id = unique_anchor(&base, existing);
                *explicit = Some(CowStr::from(id.clone()));
            }
        }
    }

    TocEntry { level, id, text }
}

fn unique_anchor(base: &str, existing: &[TocEntry]) -> String {
    let taken = |candidate: &str| existing.iter().any(|e| e.id == candidate);
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Drop MDX `import`/`export` statements outside fenced code
///
/// A statement runs until its brackets balance, and never past a blank line.
pub fn strip_esm(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut fence: Option<&str> = None;
    let mut esm: Option<EsmScanner> = None;

    for line in source.split_inclusive('\n') {
        if let Some(scanner) = esm.as_mut() {
            if line.trim().is_empty() {
                esm = None;
            } else {
                scanner.feed(line);
                if scanner.is_closed() {
                    esm = None;
                }
                continue;
            }
        }

        let trimmed = line.trim_start();
        match fence {
            Some(marker) => {
                if trimmed.starts_with(marker) {
                    fence = None;
                }
            }
            None => {
                if trimmed.starts_with("```") {
                    fence = Some("```");
                } else if trimmed.starts_with("~~~") {
                    fence = Some("~~~");
                } else if ESM_LINE.is_match(line) {
                    let mut scanner = EsmScanner::default();
                    scanner.feed(line);
                    if !scanner.is_closed() {
                        esm = Some(scanner);
                    }
                    continue;
                }
            }
        }
        out.push_str(line);
    }

    out
}

/// Tracks bracket depth and open string literals across the lines of a statement
#[derive(Default)]
struct EsmScanner {
    depth: i32,
    quote: Option<char>,
}

impl EsmScanner {
    fn feed(&mut self, line: &str) {
        let mut escaped = false;
        for c in line.chars() {
            if let Some(q) = self.quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    self.quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' | '`' => self.quote = Some(c),
                '{' | '(' | '[' => self.depth += 1,
                '}' | ')' | ']' => self.depth -= 1,
                _ => {}
            }
        }
        // Only template literals span lines
        if matches!(self.quote, Some('\'') | Some('"')) {
            self.quote = None;
        }
    }

    fn is_closed(&self) -> bool {
        self.depth <= 0 && self.quote.is_none()
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
