//! Repeated trailing-phrase detection over raw table cells.
//!
//! Curriculum templates embed many "label: value" pairs across table
//! cells; copy-pasted trailing phrases across what should be distinct
//! cells are a structural defect. Each cell segment is fingerprinted
//! by its trailing bigram, and a Devanagari token is flagged for a
//! segment when it occurs in more than one recorded bigram anywhere in
//! the document.
//!
//! This pass deliberately re-walks the document's tables instead of
//! reusing the extractor's output: extraction deduplicates, and
//! repetition must be detected on raw cell content.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::sanitize::sanitize_devanagari;
use crate::docx::Document;

static DEVANAGARI_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ऀ-ॿ]+").unwrap());

/// Which part of a "label: value" cell a finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentLabel {
    /// Text before the first colon.
    Before,
    /// Text after the first colon.
    After,
    /// The whole cell (no colon).
    Whole,
}

impl SegmentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Whole => "whole",
        }
    }
}

/// One row of the "Repeated Phrases" sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepetitionRow {
    pub table: usize,
    pub row: usize,
    pub col: usize,
    pub segment: SegmentLabel,
    /// Repeated tokens from this segment's trailing bigram.
    pub repeated: Vec<String>,
}

struct Snippet {
    bigram: String,
    table: usize,
    row: usize,
    col: usize,
    segment: SegmentLabel,
}

/// Detect trailing bigrams repeated across the document's table cells.
pub fn detect_repeated_phrases(doc: &Document) -> Vec<RepetitionRow> {
    let snippets = collect_snippets(doc);

    // Token frequencies over every recorded bigram. A token repeated
    // across segments marks each segment it appears in.
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for snippet in &snippets {
        for token in DEVANAGARI_WORD.find_iter(&snippet.bigram) {
            *counts.entry(token.as_str()).or_default() += 1;
        }
    }

    snippets
        .iter()
        .filter_map(|snippet| {
            let mut repeated: Vec<String> = Vec::new();
            for token in DEVANAGARI_WORD.find_iter(&snippet.bigram) {
                let token = token.as_str();
                if counts.get(token).copied().unwrap_or(0) > 1
                    && !repeated.iter().any(|t| t == token)
                {
                    repeated.push(token.to_string());
                }
            }
            if repeated.is_empty() {
                return None;
            }
            Some(RepetitionRow {
                table: snippet.table,
                row: snippet.row,
                col: snippet.col,
                segment: snippet.segment,
                repeated,
            })
        })
        .collect()
}

/// Walk every table cell, split on the first colon, and record the
/// trailing bigram of each sanitized segment with its coordinates.
fn collect_snippets(doc: &Document) -> Vec<Snippet> {
    let mut snippets = Vec::new();
    for (ti, table) in doc.tables().enumerate() {
        for (ri, row) in table.rows.iter().enumerate() {
            for (ci, cell) in row.iter().enumerate() {
                let raw = cell.trim();
                if raw.is_empty() {
                    continue;
                }
                let segments: Vec<(&str, SegmentLabel)> = match raw.split_once(':') {
                    Some((before, after)) => vec![
                        (before, SegmentLabel::Before),
                        (after, SegmentLabel::After),
                    ],
                    None => vec![(raw, SegmentLabel::Whole)],
                };
                for (segment, label) in segments {
                    let clean = sanitize_devanagari(segment);
                    let tokens: Vec<&str> = clean.split_whitespace().collect();
                    if tokens.len() < 2 {
                        continue;
                    }
                    snippets.push(Snippet {
                        bigram: tokens[tokens.len() - 2..].join(" "),
                        table: ti,
                        row: ri,
                        col: ci,
                        segment: label,
                    });
                }
            }
        }
    }
    snippets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{BodyElement, Table};

    fn doc_with_table(rows: &[&[&str]]) -> Document {
        Document {
            body: vec![BodyElement::Table(Table {
                rows: rows
                    .iter()
                    .map(|r| r.iter().map(|c| c.to_string()).collect())
                    .collect(),
            })],
        }
    }

    #[test]
    fn test_shared_trailing_bigram_flags_both_cells() {
        let doc = doc_with_table(&[&["पहिली चाचणी वेळ", "दुसरी चाचणी वेळ"]]);
        let rows = detect_repeated_phrases(&doc);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].repeated, vec!["चाचणी", "वेळ"]);
        assert_eq!(rows[1].repeated, rows[0].repeated);
        assert_eq!(rows[0].col, 0);
        assert_eq!(rows[1].col, 1);
    }

    #[test]
    fn test_unique_trailing_phrase_yields_nothing() {
        let doc = doc_with_table(&[&["एकमेव शेवट इथे"]]);
        assert!(detect_repeated_phrases(&doc).is_empty());
    }

    #[test]
    fn test_colon_splits_cell_into_labeled_segments() {
        let doc = doc_with_table(&[&[
            "गट वेळ सारणी: सकाळची खेळ वेळ",
            "दुसरा स्तंभ: संध्याकाळची खेळ वेळ",
        ]]);
        let rows = detect_repeated_phrases(&doc);
        // The "after" segments share the trailing bigram "खेळ वेळ".
        assert!(rows
            .iter()
            .any(|r| r.segment == SegmentLabel::After && r.repeated.contains(&"खेळ".to_string())));
        assert!(rows.iter().all(|r| r.segment != SegmentLabel::Whole));
    }

    #[test]
    fn test_short_segments_skipped() {
        let doc = doc_with_table(&[&["वेळ", "वेळ"]]);
        assert!(detect_repeated_phrases(&doc).is_empty());
    }

    #[test]
    fn test_repeats_detected_across_tables() {
        let doc = Document {
            body: vec![
                BodyElement::Table(Table {
                    rows: vec![vec!["पहिली चाचणी वेळ".to_string()]],
                }),
                BodyElement::Table(Table {
                    rows: vec![vec!["दुसरी चाचणी वेळ".to_string()]],
                }),
            ],
        };
        let rows = detect_repeated_phrases(&doc);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].table, 0);
        assert_eq!(rows[1].table, 1);
    }
}
