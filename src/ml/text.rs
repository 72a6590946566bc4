//! Text preprocessing and tokenization for the summarization model
//!
//! Wraps a HuggingFace `tokenizers` tokenizer: normalizes input, applies the task
//! prefix, truncates to the input-token cap and decodes generated ids back to text.

use crate::error::{BrieflyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokenizers::Tokenizer;
use unicode_normalization::UnicodeNormalization;

/// Text preprocessing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// Maximum input sequence length in tokens (special tokens included)
    pub max_length: usize,
    /// Prefix prepended before tokenization (e.g. "summarize: ")
    pub prefix: String,
    /// Whether to normalize unicode
    pub normalize_unicode: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            max_length: 512,
            prefix: "summarize: ".to_string(),
            normalize_unicode: true,
        }
    }
}

/// Tokenized text ready for model inference
#[derive(Debug, Clone)]
pub struct TokenizedText {
    /// Token IDs
    pub input_ids: Vec<u32>,
    /// Whether the input was cut at `max_length`
    pub truncated: bool,
}

/// Text preprocessor and tokenizer
pub struct TextProcessor {
    tokenizer: Tokenizer,
    config: TextConfig,
    eos_token_id: Option<u32>,
}

impl TextProcessor {
    /// Load the tokenizer from a `tokenizer.json` file
    pub fn from_file<P: AsRef<Path>>(tokenizer_path: P, config: TextConfig) -> Result<Self> {
        let path = tokenizer_path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            BrieflyError::MachineLearning(format!("Failed to load tokenizer from {:?}: {}", path, e))
        })?;
        log::info!("Loaded tokenizer from {:?}", path);

        Ok(Self::with_tokenizer(tokenizer, config))
    }

    /// Wrap an already constructed tokenizer
    pub fn with_tokenizer(tokenizer: Tokenizer, config: TextConfig) -> Self {
        let eos_token_id = tokenizer.token_to_id("</s>");
        Self {
            tokenizer,
            config,
            eos_token_id,
        }
    }

    /// Preprocess text (normalize, collapse whitespace, add prefix)
    pub fn preprocess_text(&self, text: &str) -> String {
        let normalized = if self.config.normalize_unicode {
            text.nfc().collect::<String>()
        } else {
            text.to_string()
        };

        let collapsed = normalized.split_whitespace().collect::<Vec<&str>>().join(" ");
        format!("{}{}", self.config.prefix, collapsed)
    }

    /// Tokenize text for model inference, truncating to `max_length`
    pub fn tokenize(&self, text: &str) -> Result<TokenizedText> {
        let preprocessed = self.preprocess_text(text);
        let encoding = self.tokenizer.encode(preprocessed, true)?;
        let mut input_ids = encoding.get_ids().to_vec();

        let truncated = input_ids.len() > self.config.max_length;
        if truncated {
            input_ids.truncate(self.config.max_length);
            // Keep the end-of-sequence marker the model was trained to see
            if let (Some(eos), Some(last)) = (self.eos_token_id, input_ids.last_mut()) {
                *last = eos;
            }
            log::debug!(
                "Truncated chunk input to {} tokens",
                self.config.max_length
            );
        }

        Ok(TokenizedText {
            input_ids,
            truncated,
        })
    }

    /// Decode generated ids, skipping pad/eos and other special tokens
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        let text = self.tokenizer.decode(ids, true)?;
        Ok(text.trim().to_string())
    }
}
