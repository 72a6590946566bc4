//! Chunked abstractive summarization
//!
//! Long text is split into word-bounded chunks, each chunk is summarized on its own and
//! the partial summaries are joined in chunk order.

use crate::error::{BrieflyError, Result};
use crate::text::chunking::TextChunker;
use std::sync::Arc;
use std::time::Instant;

/// Default number of words per chunk
pub const DEFAULT_CHUNK_WORDS: usize = 500;

/// A pretrained sequence-to-sequence model that summarizes one chunk
pub trait SummaryModel: Send + Sync {
    fn summarize_chunk(&self, chunk: &str) -> Result<String>;
}

/// Summarizer over an injected, read-only model
#[derive(Clone)]
pub struct Summarizer {
    model: Arc<dyn SummaryModel>,
    chunk_words: usize,
}

impl Summarizer {
    pub fn new(model: Arc<dyn SummaryModel>) -> Self {
        Self::with_chunk_words(model, DEFAULT_CHUNK_WORDS)
    }

    pub fn with_chunk_words(model: Arc<dyn SummaryModel>, chunk_words: usize) -> Self {
        Self { model, chunk_words }
    }

    /// Summarize `text`. Empty or whitespace-only input yields an empty summary without
    /// invoking the model.
    pub fn summarize(&self, text: &str) -> Result<String> {
        let chunks = TextChunker::new(self.chunk_words)?.chunk_text(text);
        if chunks.is_empty() {
            return Ok(String::new());
        }

        log::info!("Summarizing {} chunk(s)", chunks.len());
        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let started = Instant::now();
            let summary = self.model.summarize_chunk(&chunk.text)?;
            log::debug!(
                "Chunk {} ({} words) summarized in {:.2}s",
                chunk.index,
                chunk.word_count,
                started.elapsed().as_secs_f32()
            );
            summaries.push(summary);
        }

        Ok(summaries.join(" "))
    }

    /// `summarize` on the blocking thread pool
    pub async fn summarize_blocking(&self, text: String) -> Result<String> {
        let summarizer = self.clone();
        tokio::task::spawn_blocking(move || summarizer.summarize(&text))
            .await
            .map_err(|e| BrieflyError::Generic(format!("Summarization task failed: {}", e)))?
    }
}
