//! Process command - extract transaction details from a single receipt.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use dekont_core::models::config::DekontConfig;
use dekont_core::receipt::report::label;
use dekont_core::{BankId, FieldKind, ParseOutcome, ReportStyle};

use super::{build_parser, load_config, load_receipt_text, timestamp};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or text), or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only consult these bank profiles (comma separated codes)
    #[arg(short, long, value_delimiter = ',')]
    banks: Vec<BankId>,

    /// Show which profile resolved each field
    #[arg(long)]
    explain: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain report
    Text,
    /// Chat message with prefix and optional timestamp
    Markdown,
    /// JSON with fields, sources and missing fields
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }

    pub fn report_style(self, config: &DekontConfig) -> ReportStyle {
        match self {
            OutputFormat::Markdown => ReportStyle::Markdown,
            _ => config.extraction.report_style,
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing {}", args.input.display());

    let Some(text) = load_receipt_text(&args.input, &config)? else {
        eprintln!(
            "{} Skipped {}: larger than {} MB",
            style("⚠").yellow(),
            args.input.display(),
            config.pdf.max_file_size_mb
        );
        return Ok(());
    };

    let parser = build_parser(&config, &args.banks, args.format.report_style(&config));
    let outcome = parser.parse(&text);

    if args.explain {
        explain(&outcome);
    }

    match render(&outcome, args.format, &config)? {
        Some(output) => write_output(&output, args.output.as_ref())?,
        None => {
            eprintln!(
                "{} No transaction fields recognized in {}",
                style("ℹ").blue(),
                args.input.display()
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Format an outcome, `None` when there is nothing to report.
pub fn render(
    outcome: &ParseOutcome,
    format: OutputFormat,
    config: &DekontConfig,
) -> anyhow::Result<Option<String>> {
    if outcome.report.is_empty() {
        return Ok(None);
    }

    let output = match format {
        OutputFormat::Text => outcome.report.clone(),
        OutputFormat::Markdown => {
            let ts = if config.output.include_timestamp {
                Some(timestamp(config)?)
            } else {
                None
            };
            config.output.decorate(&outcome.report, ts.as_deref())
        }
        OutputFormat::Json => serde_json::to_string_pretty(outcome)?,
    };

    Ok(Some(output))
}

fn write_output(output: &str, path: Option<&PathBuf>) -> anyhow::Result<()> {
    if let Some(output_path) = path {
        fs::write(output_path, output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn explain(outcome: &ParseOutcome) {
    for kind in FieldKind::REPORT_ORDER {
        match outcome.result.origin(kind) {
            Some(origin) => eprintln!(
                "{} {:<14} {} {:.2} {}",
                style("✓").green(),
                label(kind),
                style(&origin.source).dim(),
                origin.confidence,
                style(format!("{:?}", origin.matched)).dim()
            ),
            None => eprintln!("{} {:<14} not found", style("✗").red(), label(kind)),
        }
    }
    eprintln!(
        "{} Processing time: {}ms",
        style("ℹ").blue(),
        outcome.processing_time_ms
    );
}
