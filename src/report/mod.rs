//! Multi-sheet workbook assembly.
//!
//! Every audited document gets one workbook with a fixed set of five
//! sheets, one per analysis pass. Sheets are written even when empty
//! so reports always have the same shape.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::analysis::presence::PresenceRow;
use crate::analysis::repetition::RepetitionRow;
use crate::analysis::replace::ReplacementRow;
use crate::grammar::GrammarReport;

/// Fixed sheet names, in workbook order.
pub const SHEET_NAMES: [&str; 5] = [
    "Word Presence",
    "Spell Check",
    "Repeated Phrases",
    "Replacements",
    "Grammar Check",
];

/// Results of all five analysis passes over one document.
#[derive(Debug, Default)]
pub struct AuditFindings {
    pub presence: Vec<PresenceRow>,
    pub misspellings: Vec<String>,
    pub repetitions: Vec<RepetitionRow>,
    pub replacements: Vec<ReplacementRow>,
    pub grammar: Vec<GrammarReport>,
}

/// Write the findings to a workbook at `path`.
pub fn write_workbook(findings: &AuditFindings, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();

    write_presence(workbook.add_worksheet(), &findings.presence)?;
    write_spell(workbook.add_worksheet(), &findings.misspellings)?;
    write_repetitions(workbook.add_worksheet(), &findings.repetitions)?;
    write_replacements(workbook.add_worksheet(), &findings.replacements)?;
    write_grammar(workbook.add_worksheet(), &findings.grammar)?;

    workbook.save(path)?;
    info!("Wrote report: {}", path.display());
    Ok(())
}

fn header(sheet: &mut Worksheet, name: &str, columns: &[&str]) -> Result<(), XlsxError> {
    sheet.set_name(name)?;
    for (col, title) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }
    Ok(())
}

fn write_presence(sheet: &mut Worksheet, rows: &[PresenceRow]) -> Result<(), XlsxError> {
    header(sheet, SHEET_NAMES[0], &["Word", "Status"])?;
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.word.as_str())?;
        sheet.write_string(r, 1, row.status.as_str())?;
    }
    Ok(())
}

fn write_spell(sheet: &mut Worksheet, words: &[String]) -> Result<(), XlsxError> {
    header(sheet, SHEET_NAMES[1], &["Misspelled Word"])?;
    for (i, word) in words.iter().enumerate() {
        sheet.write_string((i + 1) as u32, 0, word.as_str())?;
    }
    Ok(())
}

fn write_repetitions(sheet: &mut Worksheet, rows: &[RepetitionRow]) -> Result<(), XlsxError> {
    header(sheet, SHEET_NAMES[2], &["Table", "Row", "Col", "Segment", "Repeated"])?;
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_number(r, 0, row.table as f64)?;
        sheet.write_number(r, 1, row.row as f64)?;
        sheet.write_number(r, 2, row.col as f64)?;
        sheet.write_string(r, 3, row.segment.as_str())?;
        sheet.write_string(r, 4, row.repeated.join(", ").as_str())?;
    }
    Ok(())
}

fn write_replacements(sheet: &mut Worksheet, rows: &[ReplacementRow]) -> Result<(), XlsxError> {
    header(sheet, SHEET_NAMES[3], &["Word", "Replacement"])?;
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.word.as_str())?;
        sheet.write_string(r, 1, row.replacement.as_str())?;
    }
    Ok(())
}

fn write_grammar(sheet: &mut Worksheet, reports: &[GrammarReport]) -> Result<(), XlsxError> {
    header(sheet, SHEET_NAMES[4], &["Block", "Sentence", "Error", "Suggestion"])?;
    let mut r: u32 = 1;
    for report in reports {
        for mistake in &report.grammar_mistakes {
            sheet.write_number(r, 0, report.block_number as f64)?;
            sheet.write_string(r, 1, mistake.sentence.as_str())?;
            sheet.write_string(r, 2, mistake.error.as_str())?;
            sheet.write_string(r, 3, mistake.suggestion.as_str())?;
            r += 1;
        }
    }
    Ok(())
}
