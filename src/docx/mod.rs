//! Word-processor document model.
//!
//! A parsed `.docx` is reduced to the pieces the audit passes need:
//! body elements in document order, each a paragraph or a table grid.

mod reader;

pub use reader::{read_document, DocxError};

/// One element of the document body, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyElement {
    /// A paragraph's concatenated run text.
    Paragraph(String),
    /// A table grid.
    Table(Table),
}

/// A table as a grid of rows of cell texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Rows of cell text, in document order. Within a cell, the text
    /// of its paragraphs joined by newlines.
    pub rows: Vec<Vec<String>>,
}

/// A parsed document. Read-only input to the analysis passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Body elements in document order.
    pub body: Vec<BodyElement>,
}

impl Document {
    /// Iterate the document's tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|el| match el {
            BodyElement::Table(t) => Some(t),
            BodyElement::Paragraph(_) => None,
        })
    }
}
