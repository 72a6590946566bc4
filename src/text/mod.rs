//! Text processing for briefly-rs
//!
//! Word-bounded chunking and extraction of text from uploaded documents.

pub mod chunking;
pub mod extract;

// Re-export main types and functions
pub use chunking::{Chunk, TextChunker, chunk};
pub use extract::{
    DocumentKind, PdfExtractor, PlainTextExtractor, TextExtractor, extract_from_path,
    extract_from_pdf, extract_upload, normalize_text,
};
