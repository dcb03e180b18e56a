//! URL detection in free-form message text.
//!
//! Recognises scheme URLs, `www.` hosts, and bare `domain.tld` links whose
//! suffix is on the public suffix list. Addresses after an `@` are e-mail
//! addresses, not links.

use regex::Regex;
use std::sync::OnceLock;

/// Characters stripped from the end of a match (sentence punctuation).
const TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\'', '"'];

/// Scheme and `www.` links match outright; a bare domain is captured as
/// `host` and only counts when its suffix is known.
const DEFAULT_PATTERN: &str = r#"(?i)(?:(?:https?|ftp)://[^\s<>"]+|www\.[^\s<>"]+|\b(?P<host>(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63})\b(?:/[^\s<>"]*)?)"#;

/// True when `host` ends in a suffix from the public suffix list.
fn has_known_suffix(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    psl::suffix(host.as_bytes()).is_some_and(|suffix| suffix.is_known())
}

/// Finds links in message text.
pub struct LinkExtractor {
    pattern: Regex,
}

impl LinkExtractor {
    /// Create an extractor with the default link pattern.
    pub fn new() -> Self {
        // pattern is a compile-time constant
        Self::with_pattern(DEFAULT_PATTERN).expect("default link pattern is valid")
    }

    /// Create an extractor from a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// All links in `text`, in order of appearance.
    pub fn find_urls<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern
            .captures_iter(text)
            .filter(|caps| caps.name("host").map_or(true, |h| has_known_suffix(h.as_str())))
            .filter_map(|caps| caps.get(0))
            .filter(|m| !text[..m.start()].ends_with('@'))
            .map(|m| m.as_str().trim_end_matches(TRAILING))
            .filter(|url| !url.is_empty())
            .collect()
    }

    /// Number of links in `text`.
    pub fn count_urls(&self, text: &str) -> usize {
        self.find_urls(text).len()
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide extractor, compiled on first use.
pub fn shared() -> &'static LinkExtractor {
    static SHARED: OnceLock<LinkExtractor> = OnceLock::new();
    SHARED.get_or_init(LinkExtractor::new)
}
