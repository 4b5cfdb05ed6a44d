//! Subcommands and the input handling they share.

pub mod banks;
pub mod batch;
pub mod config;
pub mod process;

use std::fmt::Write as _;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use dekont_core::models::config::DekontConfig;
use dekont_core::pdf::receipt_text_from_path;
use dekont_core::{BankId, CascadeParser, ReportStyle};

/// Input name that reads receipt text from stdin.
pub const STDIN_INPUT: &str = "-";

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dekont")
        .join("config.json")
}

/// Load the config named by `--config`, else the default file if present,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DekontConfig> {
    if let Some(path) = config_path {
        return DekontConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config file {}", path.display());
        return Ok(DekontConfig::from_file(&path)?);
    }

    Ok(DekontConfig::default())
}

/// Parser restricted to `banks`, or to the configured banks when empty.
pub fn build_parser(
    config: &DekontConfig,
    banks: &[BankId],
    style: ReportStyle,
) -> CascadeParser<'static> {
    let banks = if banks.is_empty() {
        &config.extraction.banks
    } else {
        banks
    };

    CascadeParser::new().with_banks(banks).with_style(style)
}

/// Receipt text of an input, or `None` when the file was skipped.
pub fn load_receipt_text(input: &Path, config: &DekontConfig) -> anyhow::Result<Option<String>> {
    if input.as_os_str() == STDIN_INPUT {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(Some(text));
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let size = fs::metadata(input)?.len();
    if let Some(limit) = config.pdf.max_file_size_bytes() {
        if size > limit {
            warn!(
                "Skipping {}: {} bytes exceeds the {} MB limit",
                input.display(),
                size,
                config.pdf.max_file_size_mb
            );
            return Ok(None);
        }
    }

    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => receipt_text_from_path(input, config.pdf.first_page_only)?,
        "txt" | "text" => fs::read_to_string(input)?,
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    debug!("Read {} characters from {}", text.len(), input.display());
    Ok(Some(text))
}

/// Current local time in the configured format.
pub fn timestamp(config: &DekontConfig) -> anyhow::Result<String> {
    let mut formatted = String::new();
    write!(
        formatted,
        "{}",
        chrono::Local::now().format(&config.output.timestamp_format)
    )
    .map_err(|_| {
        anyhow::anyhow!(
            "Invalid timestamp format: {}",
            config.output.timestamp_format
        )
    })?;
    Ok(formatted)
}

pub fn is_supported(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
}
