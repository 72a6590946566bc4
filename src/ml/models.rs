//! Model management for the summarization model
//!
//! This module knows which checkpoints the summarizer can run, downloads their files
//! from the HuggingFace Hub and keeps them in a local cache directory.

use crate::error::{BrieflyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Files every supported checkpoint needs
pub const REQUIRED_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];

/// Architectures the summarizer can load
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// T5-family encoder-decoder (t5, flan-t5 and their fine-tunes)
    T5,
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// HuggingFace model hub identifier
    pub hub_id: String,
    /// Model type
    pub model_type: ModelType,
    /// Local directory holding the downloaded files
    pub local_path: Option<PathBuf>,
}

/// Paths of a downloaded checkpoint
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelFiles {
    fn in_dir(dir: &Path) -> Self {
        Self {
            config: dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
            weights: dir.join("model.safetensors"),
        }
    }
}

/// Model manager for downloading and caching checkpoints
pub struct ModelManager {
    cache_dir: PathBuf,
    models: HashMap<String, ModelInfo>,
}

impl ModelManager {
    /// Create new model manager
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
                .join(".cache")
                .join("briefly-rs")
                .join("models")
        });

        std::fs::create_dir_all(&cache_dir)?;

        let mut manager = Self {
            cache_dir,
            models: HashMap::new(),
        };
        manager.register_default_models();

        Ok(manager)
    }

    fn register_default_models(&mut self) {
        for hub_id in ["t5-small", "t5-base", "google/flan-t5-base", "google/flan-t5-large"] {
            self.add_model(ModelInfo {
                hub_id: hub_id.to_string(),
                model_type: ModelType::T5,
                local_path: None,
            });
        }
    }

    /// Register a checkpoint; unknown hub ids are accepted as T5 models
    pub fn add_model(&mut self, model_info: ModelInfo) {
        self.models.insert(model_info.hub_id.clone(), model_info);
    }

    /// Get cache directory
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Local directory for a hub id (`org/name` becomes `org--name`)
    pub fn model_dir(&self, hub_id: &str) -> PathBuf {
        self.cache_dir.join(hub_id.replace('/', "--"))
    }

    /// Download a checkpoint (if needed) and return the paths of its files
    pub fn ensure_model(&mut self, hub_id: &str) -> Result<ModelFiles> {
        if !self.models.contains_key(hub_id) {
            log::info!("Registering custom T5 checkpoint '{}'", hub_id);
            self.add_model(ModelInfo {
                hub_id: hub_id.to_string(),
                model_type: ModelType::T5,
                local_path: None,
            });
        }

        let model_dir = self.model_dir(hub_id);
        if Self::validate_model_files(&model_dir) {
            log::info!("Model '{}' already cached at {:?}", hub_id, model_dir);
        } else {
            std::fs::create_dir_all(&model_dir)?;
            log::info!("Downloading model '{}' from HuggingFace Hub", hub_id);

            let api = hf_hub::api::sync::Api::new().map_err(|e| {
                BrieflyError::MachineLearning(format!("Failed to create HF API: {}", e))
            })?;
            let repo = api.model(hub_id.to_string());

            for file_name in REQUIRED_FILES {
                let target_path = model_dir.join(file_name);
                if target_path.exists() && target_path.metadata()?.len() > 0 {
                    continue;
                }
                let downloaded = repo.get(file_name).map_err(|e| {
                    BrieflyError::MachineLearning(format!(
                        "Failed to download {}/{}: {}",
                        hub_id, file_name, e
                    ))
                })?;
                std::fs::copy(&downloaded, &target_path)?;
                log::debug!("Downloaded {}/{} to {:?}", hub_id, file_name, target_path);
            }
        }

        if let Some(model) = self.models.get_mut(hub_id) {
            model.local_path = Some(model_dir.clone());
        }

        Ok(ModelFiles::in_dir(&model_dir))
    }

    fn validate_model_files(model_dir: &Path) -> bool {
        REQUIRED_FILES.iter().all(|file_name| {
            model_dir
                .join(file_name)
                .metadata()
                .map(|meta| meta.len() > 0)
                .unwrap_or(false)
        })
    }
}
