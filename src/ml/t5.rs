//! T5 summarization model on candle
//!
//! Loads a T5-architecture checkpoint (t5, flan-t5 and fine-tunes) and summarizes a
//! single chunk with beam search.

use crate::config::SummarizerConfig;
use crate::error::{BrieflyError, Result};
use crate::ml::device::DeviceManager;
use crate::ml::generation::{beam_search, GenerationConfig};
use crate::ml::models::ModelManager;
use crate::ml::text::{TextConfig, TextProcessor};
use crate::summarizer::SummaryModel;

use candle_core::{DType, Device, Tensor, D};
use candle_nn::VarBuilder;
use candle_transformers::models::t5;

/// Summarization model backed by `T5ForConditionalGeneration`
pub struct T5SummaryModel {
    model: t5::T5ForConditionalGeneration,
    text_processor: TextProcessor,
    device: Device,
    generation: GenerationConfig,
}

impl T5SummaryModel {
    /// Download (if needed) and load the configured checkpoint
    pub fn load(config: &SummarizerConfig) -> Result<Self> {
        log::info!("Loading summarization model: {}", config.model_id);

        let mut model_manager = ModelManager::new(config.cache_dir.clone())?;
        log::debug!("Model cache: {}", model_manager.cache_dir().display());
        let files = model_manager.ensure_model(&config.model_id)?;

        let raw_config = std::fs::read_to_string(&files.config)?;
        let mut t5_config: t5::Config = serde_json::from_str(&raw_config)?;
        // Beam hypotheses diverge, so every step re-decodes the full prefix
        t5_config.use_cache = false;

        let devices = DeviceManager::detect();
        log::debug!(
            "Detected devices: {}",
            devices
                .available_devices()
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let device_info = devices.select(config.device);
        let device = device_info.device.clone();
        log::info!("Using device: {}", device_info.name);

        // Safety: the weights file is not modified while mapped
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DType::F32, &device)?
        };
        let model = t5::T5ForConditionalGeneration::load(vb, &t5_config)?;

        let text_processor = TextProcessor::from_file(
            &files.tokenizer,
            TextConfig {
                max_length: config.max_input_tokens,
                prefix: config.prefix.clone(),
                normalize_unicode: true,
            },
        )?;

        let generation = GenerationConfig {
            num_beams: config.num_beams,
            max_length: config.max_output_tokens,
            early_stopping: config.early_stopping,
            length_penalty: config.length_penalty,
            decoder_start_token_id: t5_config
                .decoder_start_token_id
                .unwrap_or(t5_config.pad_token_id) as u32,
            eos_token_id: t5_config.eos_token_id as u32,
        };

        log::info!("Summarization model '{}' ready", config.model_id);

        Ok(Self {
            model,
            text_processor,
            device,
            generation,
        })
    }

    fn next_log_probs(
        model: &mut t5::T5ForConditionalGeneration,
        encoder_output: &Tensor,
        prefix: &[u32],
        device: &Device,
    ) -> Result<Vec<f32>> {
        let decoder_input = Tensor::new(prefix, device)?.unsqueeze(0)?;
        let logits = model.decode(&decoder_input, encoder_output)?.squeeze(0)?;
        let log_probs = candle_nn::ops::log_softmax(&logits.to_dtype(DType::F32)?, D::Minus1)?;
        Ok(log_probs.to_vec1::<f32>()?)
    }
}

impl SummaryModel for T5SummaryModel {
    fn summarize_chunk(&self, chunk: &str) -> Result<String> {
        let tokenized = self.text_processor.tokenize(chunk)?;
        if tokenized.input_ids.is_empty() {
            return Err(BrieflyError::MachineLearning(
                "Tokenizer produced no input ids".to_string(),
            ));
        }

        // Weights are shared, so a per-call clone keeps `&self` lock-free
        let mut model = self.model.clone();
        let input = Tensor::new(tokenized.input_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let encoder_output = model.encode(&input)?;

        let ids = beam_search(&self.generation, |prefix| {
            Self::next_log_probs(&mut model, &encoder_output, prefix, &self.device)
        })?;

        log::debug!(
            "Generated {} tokens from {} input tokens{}",
            ids.len(),
            tokenized.input_ids.len(),
            if tokenized.truncated { " (truncated)" } else { "" }
        );

        self.text_processor.decode(&ids)
    }
}
