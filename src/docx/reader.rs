//! Reader for the `.docx` container format.
//!
//! DOCX files are ZIP archives of Open XML parts; the body lives in
//! `word/document.xml`. The reader streams that part and keeps only
//! what the audit needs: paragraph text and table cell text, in
//! document order. Table cells contain their own paragraphs, so the
//! walk tracks nesting to route run text to the right sink.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::info;
use zip::ZipArchive;

use super::{BodyElement, Document, Table};

/// Errors while reading a `.docx` file.
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Missing document part: {0}")]
    MissingPart(String),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Read and parse a `.docx` file from disk.
pub fn read_document(path: &Path) -> Result<Document, DocxError> {
    info!("Reading document: {}", path.display());
    let file = File::open(path)?;
    parse_docx(BufReader::new(file))
}

/// Parse a `.docx` from any seekable byte source.
pub fn parse_docx<R: Read + Seek>(source: R) -> Result<Document, DocxError> {
    let mut archive = ZipArchive::new(source)?;

    let xml = {
        let mut part = archive
            .by_name("word/document.xml")
            .map_err(|_| DocxError::MissingPart("word/document.xml".to_string()))?;
        let mut content = String::new();
        part.read_to_string(&mut content)?;
        content
    };

    parse_body(&xml)
}

/// Walk `word/document.xml` and collect body elements in order.
fn parse_body(xml: &str) -> Result<Document, DocxError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();

    let mut body = Vec::new();

    // Paragraph state at body level.
    let mut paragraph = String::new();
    // Table state. Nested tables are flattened into the enclosing cell.
    let mut table_depth: usize = 0;
    let mut table = Table::default();
    let mut row: Vec<String> = Vec::new();
    let mut cell_paragraphs: Vec<String> = Vec::new();
    let mut cell_paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        table = Table::default();
                    }
                }
                b"tr" if table_depth == 1 => {
                    row = Vec::new();
                }
                b"tc" if table_depth == 1 => {
                    cell_paragraphs = Vec::new();
                    cell_paragraph = String::new();
                }
                b"p" if table_depth == 0 => {
                    paragraph = String::new();
                }
                b"t" => {
                    in_text = true;
                }
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"tbl" => {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 {
                        body.push(BodyElement::Table(std::mem::take(&mut table)));
                    }
                }
                b"tr" if table_depth == 1 => {
                    table.rows.push(std::mem::take(&mut row));
                }
                b"tc" if table_depth == 1 => {
                    // Stray run text outside any paragraph; normally empty.
                    if !cell_paragraph.is_empty() {
                        cell_paragraphs.push(std::mem::take(&mut cell_paragraph));
                    }
                    row.push(cell_paragraphs.join("\n"));
                    cell_paragraphs = Vec::new();
                }
                b"p" => {
                    if table_depth == 0 {
                        body.push(BodyElement::Paragraph(std::mem::take(&mut paragraph)));
                    } else {
                        cell_paragraphs.push(std::mem::take(&mut cell_paragraph));
                    }
                }
                b"t" => {
                    in_text = false;
                }
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                // Runs encode tabs and line breaks as empty elements.
                b"tab" => current_sink(table_depth, &mut paragraph, &mut cell_paragraph).push('\t'),
                b"br" | b"cr" => {
                    current_sink(table_depth, &mut paragraph, &mut cell_paragraph).push('\n')
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape().unwrap_or_default();
                current_sink(table_depth, &mut paragraph, &mut cell_paragraph).push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    info!("Parsed {} body elements", body.len());
    Ok(Document { body })
}

/// Route run text to the open paragraph or the open table cell.
fn current_sink<'a>(
    table_depth: usize,
    paragraph: &'a mut String,
    cell_paragraph: &'a mut String,
) -> &'a mut String {
    if table_depth > 0 {
        cell_paragraph
    } else {
        paragraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap_body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{}</w:body></w:document>"#,
            inner
        )
    }

    #[test]
    fn test_paragraphs_in_order() {
        let xml = wrap_body(
            "<w:p><w:r><w:t>पहिला</w:t></w:r></w:p>\
             <w:p><w:r><w:t>दुसरा </w:t></w:r><w:r><w:t>भाग</w:t></w:r></w:p>",
        );
        let doc = parse_body(&xml).unwrap();
        assert_eq!(
            doc.body,
            vec![
                BodyElement::Paragraph("पहिला".to_string()),
                BodyElement::Paragraph("दुसरा भाग".to_string()),
            ]
        );
    }

    #[test]
    fn test_table_rows_and_cells() {
        let xml = wrap_body(
            "<w:tbl><w:tr>\
             <w:tc><w:p><w:r><w:t>अ</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t>ब</w:t></w:r></w:p></w:tc>\
             </w:tr></w:tbl>",
        );
        let doc = parse_body(&xml).unwrap();
        assert_eq!(doc.body.len(), 1);
        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows, vec![vec!["अ".to_string(), "ब".to_string()]]);
    }

    #[test]
    fn test_cell_paragraphs_join_with_newline() {
        let xml = wrap_body(
            "<w:tbl><w:tr><w:tc>\
             <w:p><w:r><w:t>वर</w:t></w:r></w:p>\
             <w:p><w:r><w:t>खाली</w:t></w:r></w:p>\
             </w:tc></w:tr></w:tbl>",
        );
        let doc = parse_body(&xml).unwrap();
        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows[0][0], "वर\nखाली");
    }

    #[test]
    fn test_cell_text_does_not_leak_into_paragraphs() {
        let xml = wrap_body(
            "<w:p><w:r><w:t>आधी</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>आत</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>नंतर</w:t></w:r></w:p>",
        );
        let doc = parse_body(&xml).unwrap();
        let paras: Vec<_> = doc
            .body
            .iter()
            .filter_map(|el| match el {
                BodyElement::Paragraph(p) => Some(p.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(paras, vec!["आधी", "नंतर"]);
    }

    #[test]
    fn test_empty_body() {
        let doc = parse_body(&wrap_body("")).unwrap();
        assert!(doc.body.is_empty());
    }

    #[test]
    fn test_missing_part() {
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            use std::io::Write;
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        buf.set_position(0);
        let err = parse_docx(buf).unwrap_err();
        assert!(matches!(err, DocxError::MissingPart(_)));
    }
}
