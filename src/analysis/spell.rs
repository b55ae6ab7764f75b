//! Spell check against a Hunspell word list.
//!
//! The dictionary is a plain Hunspell `.dic` export: an entry count on
//! the first line, then one word per line with optional affix flags
//! after a slash. Lookup is exact membership over the entries.
//!
//! Dictionary loading is allowed to fail: the pass then degrades to an
//! empty result instead of failing the whole pipeline.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use tracing::{info, warn};

/// Punctuation stripped from token edges before lookup.
const TOKEN_TRIM: &[char] = &['.', ',', '!', '?', '(', ')', '[', ']', '{', '}', ':', ';', '"', '\''];

/// Loaded Marathi word list.
pub struct MarathiDictionary {
    words: HashSet<String>,
}

impl MarathiDictionary {
    /// Load `mr_IN.dic` from the given directory. Returns `None` on
    /// any failure, logging a warning; spell check then reports
    /// nothing rather than aborting the run.
    pub fn load(dir: &Path) -> Option<Self> {
        let dic_path = dir.join("mr_IN.dic");
        let raw = match fs::read_to_string(&dic_path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Hunspell dictionary load failed ({}): {}", dic_path.display(), err);
                return None;
            }
        };

        let mut words = HashSet::new();
        for line in raw.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // Affix flags follow the word after a slash.
            let word = line.split('/').next().unwrap_or(line).trim();
            if !word.is_empty() {
                words.insert(word.to_string());
            }
        }

        info!("Loaded {} dictionary entries from {}", words.len(), dic_path.display());
        Some(Self { words })
    }

    /// Build a dictionary from an explicit word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lookup(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

/// Tokens in `text` the dictionary does not recognize, sorted and
/// deduplicated. Standardized replacement targets are never reported,
/// since they may have been introduced intentionally. Without a
/// dictionary, nothing is reported.
pub fn identify_misspellings(
    text: &str,
    dictionary: Option<&MarathiDictionary>,
    replacement_targets: &[&str],
) -> Vec<String> {
    let Some(dictionary) = dictionary else {
        return Vec::new();
    };

    let mut misspelled = BTreeSet::new();
    for token in text.split_whitespace() {
        let word = token.trim_matches(TOKEN_TRIM);
        if word.is_empty() {
            continue;
        }
        if !dictionary.lookup(word) && !replacement_targets.contains(&word) {
            misspelled.insert(word.to_string());
        }
    }
    misspelled.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dict(words: &[&str]) -> MarathiDictionary {
        MarathiDictionary::from_words(words.iter().copied())
    }

    #[test]
    fn test_unknown_tokens_reported_sorted_unique() {
        let d = dict(&["गृहपाठ", "वेळ"]);
        let miss = identify_misspellings("वेळ चुक गृहपाठ चुक अचुक", Some(&d), &[]);
        assert_eq!(miss, vec!["अचुक".to_string(), "चुक".to_string()]);
    }

    #[test]
    fn test_edge_punctuation_stripped() {
        let d = dict(&["वेळ"]);
        let miss = identify_misspellings("(वेळ) \"वेळ\", वेळ:", Some(&d), &[]);
        assert!(miss.is_empty());
    }

    #[test]
    fn test_replacement_targets_skipped() {
        let d = dict(&["वेळ"]);
        let miss = identify_misspellings("गृहपाठ वेळ", Some(&d), &["गृहपाठ"]);
        assert!(miss.is_empty());
    }

    #[test]
    fn test_no_dictionary_degrades_to_empty() {
        let miss = identify_misspellings("काहीही चालेल", None, &[]);
        assert!(miss.is_empty());
    }

    #[test]
    fn test_load_missing_dictionary_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MarathiDictionary::load(dir.path()).is_none());
    }

    #[test]
    fn test_load_dic_file_strips_affix_flags() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("mr_IN.dic")).unwrap();
        writeln!(file, "3").unwrap();
        writeln!(file, "गृहपाठ/AB").unwrap();
        writeln!(file, "वेळ").unwrap();
        writeln!(file, "खेळ/C").unwrap();
        drop(file);

        let d = MarathiDictionary::load(dir.path()).unwrap();
        assert!(d.lookup("गृहपाठ"));
        assert!(d.lookup("खेळ"));
        assert!(!d.lookup("गृहपाठ/AB"));
    }
}
