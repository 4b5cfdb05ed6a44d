//! Batch processing command for multiple receipt files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use dekont_core::models::config::DekontConfig;
use dekont_core::{BankId, CascadeParser, ParseOutcome};

use super::process::{render, OutputFormat};
use super::{build_parser, is_supported, load_config, load_receipt_text};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching receipt files
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Only consult these bank profiles (comma separated codes)
    #[arg(short, long, value_delimiter = ',')]
    banks: Vec<BankId>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// What happened to one input file.
enum FileStatus {
    Parsed(ParseOutcome),
    Skipped,
    Failed(String),
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    status: FileStatus,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn status_label(&self) -> &'static str {
        match &self.status {
            FileStatus::Parsed(outcome) if outcome.report.is_empty() => "empty",
            FileStatus::Parsed(_) => "success",
            FileStatus::Skipped => "skipped",
            FileStatus::Failed(_) => "error",
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(build_parser(
        &config,
        &args.banks,
        args.format.report_style(&config),
    ));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let parser = Arc::clone(&parser);
        let config = Arc::clone(&config);

        handles.push(tokio::task::spawn_blocking(move || {
            let result = process_single_file(path, &parser, &config);
            drop(permit);
            result
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;
        pb.inc(1);

        if let FileStatus::Failed(ref message) = result.status {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed: {}", message);
            }
        }

        results.push(result);
    }

    pb.finish_and_clear();

    if let Some(ref output_dir) = args.output_dir {
        write_outputs(output_dir, &results, args.format, &config)?;
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_summary(&results, start);

    Ok(())
}

fn process_single_file(
    path: PathBuf,
    parser: &CascadeParser<'_>,
    config: &DekontConfig,
) -> ProcessResult {
    let file_start = Instant::now();

    let status = match load_receipt_text(&path, config) {
        Ok(Some(text)) => FileStatus::Parsed(parser.parse(&text)),
        Ok(None) => FileStatus::Skipped,
        Err(e) => FileStatus::Failed(e.to_string()),
    };

    ProcessResult {
        path,
        status,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn write_outputs(
    output_dir: &Path,
    results: &[ProcessResult],
    format: OutputFormat,
    config: &DekontConfig,
) -> anyhow::Result<()> {
    for result in results {
        let FileStatus::Parsed(ref outcome) = result.status else {
            continue;
        };
        let Some(content) = render(outcome, format, config)? else {
            continue;
        };

        let output_name = result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("receipt");
        let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

        fs::write(&output_path, content)?;
        debug!("Wrote output to {}", output_path.display());
    }
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "description",
        "recipient",
        "sender",
        "amount",
        "date",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.status {
            FileStatus::Parsed(outcome) => {
                let fields = &outcome.result;
                wtr.write_record([
                    filename,
                    result.status_label(),
                    fields.description.as_str(),
                    fields.recipient.as_str(),
                    fields.sender.as_str(),
                    fields.amount.as_str(),
                    fields.date.as_str(),
                    time.as_str(),
                    "",
                ])?;
            }
            FileStatus::Skipped => {
                wtr.write_record([
                    filename,
                    result.status_label(),
                    "",
                    "",
                    "",
                    "",
                    "",
                    time.as_str(),
                    "",
                ])?;
            }
            FileStatus::Failed(message) => {
                wtr.write_record([
                    filename,
                    result.status_label(),
                    "",
                    "",
                    "",
                    "",
                    "",
                    time.as_str(),
                    message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

fn print_summary(results: &[ProcessResult], start: Instant) {
    let count = |label: &str| results.iter().filter(|r| r.status_label() == label).count();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} with fields, {} without, {} skipped, {} failed",
        style(count("success")).green(),
        style(count("empty")).yellow(),
        style(count("skipped")).yellow(),
        style(count("error")).red()
    );

    let failed: Vec<_> = results
        .iter()
        .filter_map(|r| match &r.status {
            FileStatus::Failed(message) => Some((&r.path, message)),
            _ => None,
        })
        .collect();

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (path, message) in failed {
            eprintln!("  - {}: {}", path.display(), message);
        }
    }
}
