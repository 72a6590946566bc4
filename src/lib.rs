//! # briefly-rs
//!
//! Abstractive summaries of pasted text, uploaded PDF/TXT documents and YouTube
//! transcripts, with the video summary also rendered in Urdu. Summaries come from a
//! pretrained T5 model run locally with candle; users register and log in against a
//! SQLite users table.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use briefly_rs::{Config, Summarizer, T5SummaryModel};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     // Download (once) and load the summarization model
//!     let model = T5SummaryModel::load(&config.summarizer)?;
//!     let summarizer = Summarizer::with_chunk_words(Arc::new(model), config.summarizer.chunk_words);
//!
//!     let summary = summarizer.summarize_blocking("Your long text here".to_string()).await?;
//!     println!("{}", summary);
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod ml;
pub mod present;
pub mod server;
pub mod storage;
pub mod summarizer;
pub mod text;
pub mod translate;
pub mod utils;
pub mod video;

// Re-export main API types
pub use api::{DocumentSummarizer, DocumentSummary, VideoSummarizer, VideoSummary, VideoSummaryError};
pub use auth::AuthService;
pub use config::Config;
pub use error::{BrieflyError, Result};
pub use server::{BrieflyServer, Services};

// Re-export commonly used types
pub use ml::T5SummaryModel;
pub use summarizer::{Summarizer, SummaryModel};
pub use translate::{GoogleTranslator, Translator};
pub use video::{TranscriptSource, YouTubeTranscriptSource};
