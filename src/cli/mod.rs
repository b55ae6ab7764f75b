//! CLI parser and command dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::grammar::OpenAiBackend;
use crate::services::audit::AuditService;

#[derive(Parser)]
#[command(name = "lekha")]
#[command(about = "Curriculum-compliance audit for Marathi .docx documents")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Audit documents and bundle the reports into a ZIP archive
    Audit {
        /// .docx files to audit
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output archive path
        #[arg(short, long, default_value = "analysis_reports.zip")]
        output: PathBuf,
        /// Sentences per grammar segment (overrides config)
        #[arg(long)]
        segment_sentences: Option<usize>,
        /// Skip the external grammar review
        #[arg(long)]
        no_grammar: bool,
    },

    /// Show resource and configuration status
    Check,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (mut settings, config_path) = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Audit {
            files,
            output,
            segment_sentences,
            no_grammar,
        } => {
            if let Some(n) = segment_sentences {
                settings.grammar.sentences_per_segment = n;
            }
            if no_grammar {
                settings.grammar.enabled = false;
            }
            cmd_audit(settings, files, output).await
        }
        Commands::Check => cmd_check(settings, config_path),
    }
}

async fn cmd_audit(settings: Settings, files: Vec<PathBuf>, output: PathBuf) -> anyhow::Result<()> {
    let backend = OpenAiBackend::new(settings.grammar.clone())?;
    let service = AuditService::new(settings, Box::new(backend));

    if !service.dictionary_loaded() {
        println!(
            "{}",
            style("Dictionary not found; spell check will report nothing").yellow()
        );
    }
    if !service.grammar_configured() {
        println!(
            "{}",
            style("Grammar service not configured; grammar review skipped").yellow()
        );
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let summary = service
        .run_batch(&files, &output, |_, _, path| {
            pb.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
            pb.inc(1);
        })
        .await?;
    pb.finish_and_clear();

    if summary.failed > 0 {
        println!(
            "{}",
            style(format!("{} file(s) failed and were skipped", summary.failed)).red()
        );
    }
    println!(
        "{}",
        style(format!(
            "Completed {} file(s) in {:.1}s -> {}",
            summary.produced,
            summary.elapsed.as_secs_f64(),
            output.display()
        ))
        .green()
    );
    println!(
        "{}",
        style(format!("Finished at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))).dim()
    );
    Ok(())
}

fn cmd_check(settings: Settings, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    println!("\n{}", style("Audit Tool Status").bold());
    println!("{}", "-".repeat(50));

    match config_path {
        Some(path) => println!("  {:<18} {}", "config", path.display()),
        None => println!("  {:<18} {}", "config", style("defaults (no file)").dim()),
    }
    println!("  {:<18} {} terms", "vocabulary", settings.vocabulary.len());
    println!("  {:<18} {} pairs", "term mapping", settings.replacements.len());

    let dic = settings.dictionary_dir.join("mr_IN.dic");
    let dic_status = if dic.exists() {
        style("✓ found").green()
    } else {
        style("✗ not found (spell check degrades to empty)").red()
    };
    println!("  {:<18} {}", "dictionary", dic_status);

    let key_status = if settings.grammar.api_key().is_some() {
        style("✓ present".to_string()).green()
    } else {
        style(format!("✗ {} not set", settings.grammar.api_key_env)).red()
    };
    println!("  {:<18} {}", "grammar API key", key_status);
    println!("  {:<18} {}", "grammar model", settings.grammar.model);
    println!("  {:<18} {}", "grammar endpoint", settings.grammar.endpoint);

    Ok(())
}
