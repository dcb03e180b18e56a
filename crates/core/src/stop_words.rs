use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Tokens excluded from word-frequency analysis.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Loads a whitespace/line separated stop-word file.
    ///
    /// A missing file is not an error: it is logged and yields an empty set.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let stop_words = Self::parse(&text);
                debug!(path = %path.display(), count = stop_words.len(), "Loaded stop words");
                Ok(stop_words)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Stop words file not found, continuing without stop words");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parses stop words from file contents. Tokens are lower-cased.
    pub fn parse(text: &str) -> Self {
        Self::from_words(text.split_whitespace())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_mixed_separators() {
        let stop_words = StopWords::parse("hai\nthe  Ka\n\n\tor\n");
        assert_eq!(stop_words.len(), 4);
        assert!(stop_words.contains("hai"));
        assert!(stop_words.contains("ka"));
        assert!(!stop_words.contains("Ka"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hai\nhain\nthe").unwrap();

        let stop_words = StopWords::load(file.path()).unwrap();
        assert_eq!(stop_words.len(), 3);
        assert!(stop_words.contains("hain"));
    }

    #[test]
    fn test_missing_file_is_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let stop_words = StopWords::load(dir.path().join("nope.txt")).unwrap();
        assert!(stop_words.is_empty());
    }

    #[test]
    fn test_directory_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StopWords::load(dir.path()).is_err());
    }
}
