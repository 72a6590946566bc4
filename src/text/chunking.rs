//! Word-bounded text chunking
//!
//! Splits a document into consecutive chunks of at most `max_words` whitespace-delimited
//! words so every chunk fits the summarization model's input window.

use crate::error::{BrieflyError, Result};
use serde::{Deserialize, Serialize};

/// A chunk of a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position in the document
    pub index: usize,

    /// Chunk words joined with single spaces
    pub text: String,

    /// Number of words in the chunk
    pub word_count: usize,
}

/// Split `text` into chunks of at most `max_words` words.
///
/// Words keep their original order and each appears in exactly one chunk. Empty or
/// whitespace-only text yields no chunks.
pub fn chunk(text: &str, max_words: usize) -> Result<Vec<String>> {
    Ok(TextChunker::new(max_words)?
        .chunk_text(text)
        .into_iter()
        .map(|chunk| chunk.text)
        .collect())
}

/// Chunker with a fixed word budget
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    max_words: usize,
}

impl TextChunker {
    /// Create a chunker; `max_words` must be positive
    pub fn new(max_words: usize) -> Result<Self> {
        if max_words == 0 {
            return Err(BrieflyError::InvalidInput(
                "max_words must be greater than 0".to_string(),
            ));
        }
        Ok(Self { max_words })
    }

    /// Chunk text into indexed chunks
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();

        let chunks: Vec<Chunk> = words
            .chunks(self.max_words)
            .enumerate()
            .map(|(index, group)| Chunk {
                index,
                text: group.join(" "),
                word_count: group.len(),
            })
            .collect();

        log::debug!(
            "Split {} words into {} chunk(s) of at most {} words",
            words.len(),
            chunks.len(),
            self.max_words
        );
        chunks
    }
}
