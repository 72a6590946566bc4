//! API layer for briefly-rs
//!
//! The two request pipelines: documents (pasted text or uploads) and videos.

pub mod document;
pub mod video;

// Re-export main API types
pub use document::{
    Document, DocumentOrigin, DocumentSummarizer, DocumentSummary, EMPTY_INPUT, Upload, summarize_document,
};
pub use video::{VideoSummarizer, VideoSummary, VideoSummaryError};
