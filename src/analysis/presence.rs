//! Vocabulary presence check against the persisted text export.

use std::fs;
use std::path::Path;

use serde::Serialize;

/// Whether a vocabulary term was found in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Presence {
    Present,
    NotPresent,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::NotPresent => "Not Present",
        }
    }
}

/// One row of the "Word Presence" sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRow {
    pub word: String,
    pub status: Presence,
}

/// Check which vocabulary terms appear verbatim in the exported text
/// file. One row per term, in vocabulary order.
pub fn check_word_presence(words: &[String], txt_path: &Path) -> std::io::Result<Vec<PresenceRow>> {
    let content = fs::read_to_string(txt_path)?;
    Ok(words
        .iter()
        .map(|w| PresenceRow {
            word: w.clone(),
            status: if content.contains(w.as_str()) {
                Presence::Present
            } else {
                Presence::NotPresent
            },
        })
        .collect())
}
