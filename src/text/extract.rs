//! Text extraction from uploaded documents
//!
//! PDFs are read page by page with lopdf, falling back to pdf-extract when lopdf finds
//! no text. Plain text is decoded as UTF-8. All output goes through `normalize_text`.

use crate::error::{BrieflyError, Result};
use crate::utils::get_file_extension;
use std::io::Write;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Document formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Detect the kind from an upload's file name (`.pdf` or `.txt`, case-insensitive)
    pub fn from_filename(name: &str) -> Option<Self> {
        match get_file_extension(name)?.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::PlainText => "txt",
        }
    }

    /// Extractor for this kind
    pub fn extractor(&self) -> &'static dyn TextExtractor {
        match self {
            DocumentKind::Pdf => &PdfExtractor,
            DocumentKind::PlainText => &PlainTextExtractor,
        }
    }
}

/// Turns raw document bytes into normalized text
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// PDF text extraction
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| BrieflyError::Pdf(format!("Failed to parse PDF: {}", e)))?;

        let pages = document.get_pages();
        let mut text = String::new();
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => log::debug!("No text extracted from page {}: {}", page_number, e),
            }
        }

        if text.trim().is_empty() && !pages.is_empty() {
            log::debug!("lopdf found no text in {} page(s), trying pdf-extract", pages.len());
            match pdf_extract::extract_text_from_mem(bytes) {
                Ok(fallback) => text = fallback,
                Err(e) => log::warn!("pdf-extract failed: {}", e),
            }
        }

        log::info!("Extracted {} characters from {} PDF page(s)", text.len(), pages.len());
        Ok(normalize_text(&text))
    }
}

/// UTF-8 plain text
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            BrieflyError::Extraction(format!("File is not valid UTF-8 text: {}", e))
        })?;
        Ok(normalize_text(text))
    }
}

/// Extract the text of a PDF file, pages concatenated in page order
pub fn extract_from_pdf<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(BrieflyError::Pdf(format!("PDF file not found: {}", path.display())));
    }
    let bytes = std::fs::read(path)?;
    PdfExtractor.extract_text(&bytes)
}

/// Extract the text of a file on disk, choosing the extractor from its extension
pub fn extract_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let kind = DocumentKind::from_filename(&path.to_string_lossy()).ok_or_else(|| {
        BrieflyError::InvalidInput(format!("Unsupported file type: {}", path.display()))
    })?;
    let bytes = std::fs::read(path)?;
    kind.extractor().extract_text(&bytes)
}

/// Spool an upload to a transient file in `upload_dir` and extract its text.
///
/// The file is removed when this returns, whether or not extraction succeeded.
pub fn extract_upload<P: AsRef<Path>>(upload_dir: P, kind: DocumentKind, bytes: &[u8]) -> Result<String> {
    let upload_dir = upload_dir.as_ref();
    crate::utils::ensure_directory(upload_dir)?;

    let mut spooled = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!(".{}", kind.extension()))
        .tempfile_in(upload_dir)?;
    spooled.write_all(bytes)?;
    spooled.flush()?;
    log::debug!("Spooled {} byte upload to {:?}", bytes.len(), spooled.path());

    extract_from_path(spooled.path())
}

/// Strip a UTF-8 BOM, unify line endings to `\n` and apply Unicode NFC
pub fn normalize_text(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.replace("\r\n", "\n").replace('\r', "\n").nfc().collect()
}
