//! Audit orchestration: one document through all five passes, and the
//! batch loop that bundles reports into a ZIP archive.
//!
//! Documents are processed sequentially. A document that cannot be
//! read is skipped with a logged failure; the batch continues and the
//! final archive contains only successfully produced workbooks.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::analysis::{presence, repetition, replace, sanitize, segment, spell};
use crate::config::Settings;
use crate::docx;
use crate::extract;
use crate::grammar::{self, GrammarBackend};
use crate::report::{self, AuditFindings};

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchSummary {
    /// Workbooks added to the archive.
    pub produced: usize,
    /// Documents skipped due to errors.
    pub failed: usize,
    pub elapsed: Duration,
}

/// Runs audits with resources loaded once per batch.
pub struct AuditService {
    settings: Settings,
    dictionary: Option<spell::MarathiDictionary>,
    backend: Box<dyn GrammarBackend>,
    work_dir: PathBuf,
}

impl AuditService {
    /// Create a service, loading the spell dictionary from the
    /// configured directory. A missing dictionary degrades the spell
    /// pass to an empty result.
    pub fn new(settings: Settings, backend: Box<dyn GrammarBackend>) -> Self {
        let dictionary = spell::MarathiDictionary::load(&settings.dictionary_dir);
        Self {
            settings,
            dictionary,
            backend,
            work_dir: PathBuf::from("."),
        }
    }

    /// Directory for workbooks and transient text exports.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn dictionary_loaded(&self) -> bool {
        self.dictionary.is_some()
    }

    pub fn grammar_configured(&self) -> bool {
        self.backend.is_configured()
    }

    /// Audit one document and write its workbook into the work
    /// directory. Returns the workbook path for archiving.
    pub async fn audit_document<F>(
        &self,
        docx_path: &Path,
        grammar_progress: F,
    ) -> anyhow::Result<PathBuf>
    where
        F: FnMut(usize, usize),
    {
        let document = docx::read_document(docx_path)?;
        let full_text = extract::full_text(&document);

        let base_name = docx_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        // Transient plain-text export, used by the presence check and
        // removed once the report exists.
        let txt_path = self.work_dir.join(format!("{}.txt", base_name));
        fs::write(&txt_path, &full_text)?;

        let presence = presence::check_word_presence(&self.settings.vocabulary, &txt_path)?;

        let clean = sanitize::strip_specials(&full_text);
        let misspellings = spell::identify_misspellings(
            &clean,
            self.dictionary.as_ref(),
            &self.settings.replacement_targets(),
        );

        let repetitions = repetition::detect_repeated_phrases(&document);
        let replacements = replace::find_term_replacements(&full_text, &self.settings.replacements);

        let grammar = if self.backend.is_configured() {
            let segments = segment::segment_by_sentences(
                &full_text,
                self.settings.grammar.sentences_per_segment,
            );
            grammar::analyze_segments(self.backend.as_ref(), &segments, grammar_progress).await
        } else {
            warn!("Grammar backend not configured; skipping grammar review");
            Vec::new()
        };

        let findings = AuditFindings {
            presence,
            misspellings,
            repetitions,
            replacements,
            grammar,
        };

        let workbook_path = self.work_dir.join(format!("{}_analysis.xlsx", base_name));
        report::write_workbook(&findings, &workbook_path)?;

        remove_transient(&txt_path);
        Ok(workbook_path)
    }

    /// Audit every input sequentially and bundle the workbooks into a
    /// ZIP archive at `output`. Per-document failures are logged and
    /// skipped.
    pub async fn run_batch<F>(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        mut on_document: F,
    ) -> anyhow::Result<BatchSummary>
    where
        F: FnMut(usize, usize, &Path),
    {
        let start = Instant::now();
        let total = inputs.len();

        let archive = File::create(output)?;
        let mut zip = ZipWriter::new(archive);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut produced = 0;
        let mut failed = 0;

        for (idx, docx_path) in inputs.iter().enumerate() {
            info!("File {}/{}: {}", idx + 1, total, docx_path.display());
            on_document(idx + 1, total, docx_path);

            match self.audit_document(docx_path, |_, _| {}).await {
                Ok(workbook_path) => {
                    let arcname = workbook_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| format!("report_{}.xlsx", idx + 1));
                    zip.start_file(arcname, options)?;
                    zip.write_all(&fs::read(&workbook_path)?)?;
                    remove_transient(&workbook_path);
                    produced += 1;
                }
                Err(err) => {
                    error!("Failed to audit {}: {}", docx_path.display(), err);
                    failed += 1;
                }
            }
        }

        zip.finish()?;
        Ok(BatchSummary {
            produced,
            failed,
            elapsed: start.elapsed(),
        })
    }
}

/// Best-effort cleanup: stray artifacts do not affect report
/// correctness, so deletion failures are only logged.
fn remove_transient(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!("Could not remove {}: {}", path.display(), err);
    }
}
