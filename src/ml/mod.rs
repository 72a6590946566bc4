//! Machine learning module for briefly-rs
//!
//! Pure Rust abstractive summarization on the Candle framework: device selection,
//! checkpoint caching, tokenization, beam search and the T5 model itself.

pub mod device;
pub mod generation;
pub mod models;
pub mod t5;
pub mod text;

// Re-export main types and functions
pub use device::{DeviceInfo, DeviceManager, DeviceType};
pub use generation::{GenerationConfig, beam_search};
pub use models::{ModelFiles, ModelInfo, ModelManager, ModelType};
pub use t5::T5SummaryModel;
pub use text::{TextConfig, TextProcessor, TokenizedText};
