//! Text metrics: word counts, reading time and excerpts

use serde::{Serialize, Serializer};
use std::fmt;

/// Estimated reading time of an article body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingTime {
    /// Number of words counted in the body
    pub words: usize,
    /// Whole minutes, rounded up
    pub minutes: usize,
}

impl ReadingTime {
    /// Estimate reading time for `text` at `words_per_minute`
    ///
    /// Every article takes at least one minute.
    pub fn estimate(text: &str, words_per_minute: usize) -> Self {
        let words = count_words(text);
        let minutes = words.div_ceil(words_per_minute.max(1)).max(1);
        Self { words, minutes }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

impl Serialize for ReadingTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Count words in plain text or markup
///
/// Latin words are runs of non-whitespace characters. Each CJK ideograph
/// counts as a word of its own.
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if is_cjk(c) {
            count += 1;
            in_word = false;
        } else if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            count += 1;
        }
    }

    count
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{3040}'..='\u{30FF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}')
}

/// Derive an excerpt from a raw body
///
/// Takes the first `length` characters and always appends `marker`.
pub fn derive_excerpt(body: &str, length: usize, marker: &str) -> String {
    let mut excerpt: String = body.chars().take(length).collect();
    excerpt.push_str(marker);
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("Hello, world!"), 2);
        assert_eq!(count_words("  spaced \n\t out  "), 2);
        assert_eq!(count_words("Rust 编程"), 3);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let body = "word ".repeat(201);
        let rt = ReadingTime::estimate(&body, 200);
        assert_eq!(rt.words, 201);
        assert_eq!(rt.minutes, 2);
        assert_eq!(rt.to_string(), "2 min read");
    }

    #[test]
    fn test_reading_time_short_body() {
        let rt = ReadingTime::estimate("just a few words", 200);
        assert_eq!(rt.minutes, 1);
        assert_eq!(rt.to_string(), "1 min read");

        let empty = ReadingTime::estimate("", 200);
        assert_eq!(empty.words, 0);
        assert_eq!(empty.to_string(), "1 min read");
    }

    #[test]
    fn test_reading_time_custom_speed() {
        let body = "word ".repeat(1000);
        assert_eq!(ReadingTime::estimate(&body, 250).minutes, 4);
        assert_eq!(ReadingTime::estimate(&body, 200).minutes, 5);
    }

    #[test]
    fn test_reading_time_serializes_as_text() {
        let rt = ReadingTime::estimate(&"word ".repeat(800), 200);
        assert_eq!(serde_json::to_string(&rt).unwrap(), "\"4 min read\"");
    }

    #[test]
    fn test_derive_excerpt_truncates() {
        let body = "Lorem ipsum ".repeat(21);
        let body: String = body.chars().take(250).collect();
        assert_eq!(body.chars().count(), 250);

        let excerpt = derive_excerpt(&body, 200, "...");
        let expected: String = body.chars().take(200).collect();
        assert_eq!(excerpt, format!("{}...", expected));
    }

    #[test]
    fn test_derive_excerpt_multibyte() {
        let excerpt = derive_excerpt("日本語のテキスト", 3, "…");
        assert_eq!(excerpt, "日本語…");
    }

    #[test]
    fn test_derive_excerpt_short_body_keeps_marker() {
        assert_eq!(derive_excerpt("Short.", 200, "..."), "Short....");
    }
}
