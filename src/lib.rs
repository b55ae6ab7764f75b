//! Lekhashuddhi - curriculum-compliance audit for Marathi documents.
//!
//! Runs five analysis passes over `.docx` files (word presence, spell
//! check, repeated-phrase detection, term replacements, grammar review)
//! and emits one spreadsheet report per document.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod docx;
pub mod extract;
pub mod grammar;
pub mod report;
pub mod services;
