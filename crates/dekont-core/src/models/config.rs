//! Configuration structures for receipt processing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::receipt::BankId;
use crate::error::{DekontError, Result};
use crate::receipt::report::ReportStyle;

/// Main configuration for the dekont pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DekontConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Report decoration added by the host.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Bank profiles to consult. Registry order still decides precedence;
    /// the generic fallback is always active.
    pub banks: Vec<BankId>,

    /// Label styling of the rendered report.
    pub report_style: ReportStyle,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            banks: BankId::SPECIFIC.to_vec(),
            report_style: ReportStyle::Plain,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Files larger than this are skipped (0 = unlimited).
    pub max_file_size_mb: u64,

    /// Only convert the first page; receipts put every field there.
    pub first_page_only: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            first_page_only: true,
        }
    }
}

impl PdfConfig {
    /// Size limit in bytes, `None` when unlimited.
    pub fn max_file_size_bytes(&self) -> Option<u64> {
        (self.max_file_size_mb > 0).then(|| self.max_file_size_mb * 1024 * 1024)
    }
}

/// Decoration wrapped around a non-empty report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Header line placed above the report (empty = none).
    pub message_prefix: String,

    /// Append a processing timestamp below the report.
    pub include_timestamp: bool,

    /// chrono format string for the timestamp.
    pub timestamp_format: String,

    /// Label written in front of the timestamp.
    pub timestamp_label: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            message_prefix: "📄 **Dekont Bilgileri:**".to_string(),
            include_timestamp: false,
            timestamp_format: "%d.%m.%Y %H:%M:%S".to_string(),
            timestamp_label: "İşlenme Zamanı".to_string(),
        }
    }
}

impl OutputConfig {
    /// Wrap a report with the configured prefix and an already formatted
    /// timestamp. Empty reports stay empty.
    pub fn decorate(&self, report: &str, timestamp: Option<&str>) -> String {
        if report.is_empty() {
            return String::new();
        }

        let mut message = String::new();
        if !self.message_prefix.is_empty() {
            message.push_str(&self.message_prefix);
            message.push_str("\n\n");
        }
        message.push_str(report);

        if let Some(ts) = timestamp.filter(|_| self.include_timestamp) {
            message.push_str(&format!("\n\n*{}: {}*", self.timestamp_label, ts));
        }

        message
    }
}

impl DekontConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| DekontError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DekontError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
