//! PDF text extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::{DekontError, PdfError};

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Text of the first page, where receipts carry their transaction block.
    pub fn first_page_text(&self) -> Result<String> {
        self.extract_page_text(1)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Share of the pdf-extract whole-document text that belongs to `page`,
    /// assuming lines are spread evenly over pages.
    fn proportional_page_text(&self, page: u32) -> Result<String> {
        let full_text = self.extract_text()?;
        let lines: Vec<&str> = full_text.lines().collect();
        let page_count = self.page_count() as usize;

        if page_count <= 1 {
            return Ok(full_text);
        }

        let lines_per_page = lines.len().div_ceil(page_count);
        let start = ((page - 1) as usize) * lines_per_page;
        let end = (page as usize) * lines_per_page;

        Ok(lines[start.min(lines.len())..end.min(lines.len())].join("\n"))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Bank receipts are often "encrypted" with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf_extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.document()?;
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        match doc.extract_text(&[page]) {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => {
                debug!("lopdf found no text on page {}, falling back to pdf-extract", page);
                self.proportional_page_text(page)
            }
            Err(e) => {
                warn!("lopdf text extraction failed on page {}: {}", page, e);
                self.proportional_page_text(page)
            }
        }
    }
}

/// Convert receipt PDF bytes to the text handed to the extractor.
pub fn receipt_text(data: &[u8], first_page_only: bool) -> Result<String> {
    let mut extractor = PdfExtractor::new();
    extractor.load(data)?;

    if first_page_only {
        extractor.first_page_text()
    } else {
        extractor.extract_text()
    }
}

/// Read a receipt PDF from disk and convert it to text.
pub fn receipt_text_from_path(path: &Path, first_page_only: bool) -> crate::Result<String> {
    let data = std::fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path.display());

    receipt_text(&data, first_page_only).map_err(DekontError::from)
}
