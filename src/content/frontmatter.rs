//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::sitemap::ChangeFreq;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Accept any casing of a change frequency; unknown values are dropped
fn lenient_change_freq<'de, D>(deserializer: D) -> Result<Option<ChangeFreq>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };

    match value.as_str().map(str::parse::<ChangeFreq>) {
        Some(Ok(freq)) => Ok(Some(freq)),
        _ => {
            tracing::warn!("Ignoring unknown changeFreq value {:?}", value);
            Ok(None)
        }
    }
}

/// Errors emitted while splitting or parsing front-matter
#[derive(Debug, Error)]
pub enum FrontMatterError {
    /// Opening `---` fence without a closing one
    #[error("unterminated front-matter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse
    #[error("front-matter parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Front-matter data from an article
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    #[serde(rename = "lastModified", alias = "updated")]
    pub last_modified: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub priority: Option<f32>,
    #[serde(rename = "changeFreq", deserialize_with = "lenient_change_freq")]
    pub change_freq: Option<ChangeFreq>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content without an opening `---` fence has no front-matter and is
    /// returned whole as the body.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}');
        let trimmed = content.trim_start();

        let Some(rest) = trimmed.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };

        // The opening fence must be alone on its line
        let Some(newline) = rest.find('\n') else {
            return Ok((FrontMatter::default(), content));
        };
        if !rest[..newline].trim().is_empty() {
            return Ok((FrontMatter::default(), content));
        }
        let rest = &rest[newline + 1..];

        let Some((yaml_content, remaining)) = split_closing_fence(rest) else {
            // A leading thematic break followed by prose is not front-matter
            let opens_block = rest
                .lines()
                .take_while(|line| !line.trim().is_empty())
                .any(looks_like_yaml_key);
            if opens_block {
                return Err(FrontMatterError::Unterminated);
            }
            return Ok((FrontMatter::default(), content));
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        // Empty or comment-only blocks carry no metadata
        let is_blank = yaml_content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if is_blank {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
        Ok((fm, remaining))
    }
}

/// Split `rest` at the first line consisting only of `---`
fn split_closing_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Whether a line reads as a YAML `key:` entry rather than prose
fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    let Some((key, value)) = trimmed.split_once(':') else {
        return false;
    };
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp")
        && (value.is_empty() || value.starts_with(' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
subtitle: A first post
date: 2024-01-15
image: /images/hello.png
author: Jane
tags:
  - rust
  - mdx
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.subtitle, Some("A first post".to_string()));
        assert_eq!(fm.date, Some("2024-01-15".to_string()));
        assert_eq!(fm.image, Some("/images/hello.png".to_string()));
        assert_eq!(fm.author, Some("Jane".to_string()));
        assert_eq!(fm.tags, vec!["rust", "mdx"]);
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: Single Tag Post\ntags: Notes\n---\nContent here.\n";

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_missing_and_null_tags_are_empty() {
        let (fm, _) = FrontMatter::parse("---\ntitle: No tags\n---\nBody").unwrap();
        assert!(fm.tags.is_empty());

        let (fm, _) = FrontMatter::parse("---\ntitle: Null tags\ntags:\n---\nBody").unwrap();
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_duplicate_tags_are_kept() {
        let (fm, _) = FrontMatter::parse("---\ntags: [a, b, a]\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_sitemap_fields() {
        let content = r#"---
title: Budgeting 101
lastModified: 2024-05-01
category: budgeting
featured: true
priority: 0.8
changeFreq: weekly
draft_note: keep me
---
Body
"#;
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.last_modified, Some("2024-05-01".to_string()));
        assert_eq!(fm.category, Some("budgeting".to_string()));
        assert!(fm.featured);
        assert_eq!(fm.priority, Some(0.8));
        assert_eq!(fm.change_freq, Some(ChangeFreq::Weekly));
        assert!(fm.extra.contains_key("draft_note"));
    }

    #[test]
    fn test_updated_alias() {
        let (fm, _) = FrontMatter::parse("---\nupdated: 2024-06-01\n---\n").unwrap();
        assert_eq!(fm.last_modified, Some("2024-06-01".to_string()));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nSome text.";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("---\n# nothing yet\n---\nBody").unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let err = FrontMatter::parse("---\ntitle: Oops\n\nBody without fence").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_leading_thematic_break_is_body() {
        let content = "---\nJust prose after a rule.\n\nNote: this is text, not YAML.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(remaining, content);

        let (_, remaining) = FrontMatter::parse("---").unwrap();
        assert_eq!(remaining, "---");
    }

    #[test]
    fn test_change_freq_is_lenient() {
        let (fm, _) = FrontMatter::parse("---\nchangeFreq: Weekly\n---\n").unwrap();
        assert_eq!(fm.change_freq, Some(ChangeFreq::Weekly));

        let (fm, _) = FrontMatter::parse("---\nchangeFreq: DAILY\n---\n").unwrap();
        assert_eq!(fm.change_freq, Some(ChangeFreq::Daily));

        let (fm, _) = FrontMatter::parse("---\ntitle: Kept\nchangeFreq: fortnightly\n---\n").unwrap();
        assert_eq!(fm.change_freq, None);
        assert_eq!(fm.title, Some("Kept".to_string()));

        let (fm, _) = FrontMatter::parse("---\nchangeFreq: 3\n---\n").unwrap();
        assert_eq!(fm.change_freq, None);

        let (fm, _) = FrontMatter::parse("---\nchangeFreq:\n---\n").unwrap();
        assert_eq!(fm.change_freq, None);
    }

    #[test]
    fn test_malformed_yaml() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nBody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Windows".to_string()));
        assert_eq!(remaining, "Body\r\n");
    }

    #[test]
    fn test_horizontal_rule_in_body_is_not_a_fence() {
        let content = "---\ntitle: Rules\n---\nAbove\n\n---\n\nBelow\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Rules".to_string()));
        assert!(remaining.contains("Above"));
        assert!(remaining.contains("Below"));
    }
}
