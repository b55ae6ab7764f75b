//! Ordered text extraction with de-duplication.
//!
//! Walks the document body in order and accumulates text blocks: runs
//! of lines between paragraph breaks. Within a block no line repeats,
//! and within a table row no cell value repeats. The blocks joined by
//! blank lines form the full text every downstream pass consumes.

use std::collections::HashSet;

use tracing::info;

use crate::docx::{BodyElement, Document};

/// Extract the document's full text in logical reading order.
///
/// Deterministic and idempotent: the same document always yields the
/// same string.
pub fn full_text(doc: &Document) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for element in &doc.body {
        match element {
            BodyElement::Paragraph(text) => {
                let text = text.trim();
                if text.is_empty() {
                    // Paragraph break: close the open block.
                    if !current.is_empty() {
                        blocks.push(current.join("\n"));
                        current.clear();
                    }
                } else if !seen.contains(text) {
                    current.push(text.to_string());
                    seen.insert(text.to_string());
                }
            }
            BodyElement::Table(table) => {
                for row in &table.rows {
                    let mut row_items: Vec<&str> = Vec::new();
                    let mut row_seen: HashSet<&str> = HashSet::new();
                    for cell in row {
                        let cell = cell.trim();
                        if !cell.is_empty() && !row_seen.contains(cell) {
                            row_items.push(cell);
                            row_seen.insert(cell);
                        }
                    }
                    if !row_items.is_empty() {
                        let line = row_items.join(" | ");
                        if !seen.contains(&line) {
                            current.push(line.clone());
                            seen.insert(line);
                        }
                    }
                }
            }
        }
    }

    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    info!("Extracted {} text blocks", blocks.len());
    blocks.join("\n\n")
}
