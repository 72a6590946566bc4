//! Configuration for briefly-rs
//!
//! Every section has sensible defaults. `Config::from_env` layers `BRIEFLY_*`
//! environment variables (and a `.env` file, when present) over those defaults.

use crate::error::{BrieflyError, Result};
use crate::ml::DeviceType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Minimum accepted length of the session signing secret
pub const MIN_SECRET_LENGTH: usize = 32;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub summarizer: SummarizerConfig,
    pub transcript: TranscriptConfig,
    pub translation: TranslationConfig,
    pub auth: AuthConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum multipart body size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_size: 20 * 1024 * 1024,
        }
    }
}

/// Persistent and transient storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the users table
    pub database_path: PathBuf,
    /// Directory for transient upload files
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("instance").join("users.db"),
            upload_dir: PathBuf::from("temp"),
        }
    }
}

/// Summarization model and generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// HuggingFace hub id of a T5-architecture summarization checkpoint
    pub model_id: String,
    /// Task prefix prepended to every chunk before tokenization
    pub prefix: String,
    /// Maximum words per chunk
    pub chunk_words: usize,
    /// Input token cap per chunk (truncation)
    pub max_input_tokens: usize,
    /// Output token cap per chunk, counting the decoder start token
    pub max_output_tokens: usize,
    /// Beam width
    pub num_beams: usize,
    /// Stop once `num_beams` finished hypotheses exist
    pub early_stopping: bool,
    /// Exponent applied to hypothesis length when ranking finished beams
    pub length_penalty: f32,
    /// Model cache directory (defaults to ~/.cache/briefly-rs/models)
    pub cache_dir: Option<PathBuf>,
    /// Preferred inference device
    pub device: DeviceType,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model_id: "t5-small".to_string(),
            prefix: "summarize: ".to_string(),
            chunk_words: 500,
            max_input_tokens: 512,
            max_output_tokens: 150,
            num_beams: 4,
            early_stopping: true,
            length_penalty: 1.0,
            cache_dir: None,
            device: DeviceType::Cpu,
        }
    }
}

/// Transcript service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Watch page URL; the video id is appended as the `v` query parameter
    pub watch_url: String,
    pub timeout_secs: u64,
    pub accept_language: String,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            watch_url: "https://www.youtube.com/watch".to_string(),
            timeout_secs: 20,
            accept_language: "en-US".to_string(),
        }
    }
}

/// Translation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            timeout_secs: 20,
        }
    }
}

/// Session and password settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session signing secret. Only required when serving HTTP.
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,
    pub session_ttl_secs: i64,
    pub pbkdf2_iterations: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            session_ttl_secs: 24 * 60 * 60,
            pbkdf2_iterations: 600_000,
        }
    }
}

impl AuthConfig {
    /// The signing secret, or a configuration error when it is missing or too short
    pub fn require_secret(&self) -> Result<&str> {
        match self.secret_key.as_deref() {
            None => Err(BrieflyError::Config(
                "BRIEFLY_SECRET_KEY must be set".to_string(),
            )),
            Some(secret) if secret.len() < MIN_SECRET_LENGTH => Err(BrieflyError::Config(
                format!("BRIEFLY_SECRET_KEY must be at least {} characters long", MIN_SECRET_LENGTH),
            )),
            Some(secret) => Ok(secret),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {:?}", path);
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup("BRIEFLY_HOST") {
            config.server.host = host;
        }
        parse_into(&lookup, "BRIEFLY_PORT", &mut config.server.port)?;
        if let Some(mb) = parse_var::<usize, _>(&lookup, "BRIEFLY_MAX_UPLOAD_MB")? {
            config.server.max_upload_size = mb * 1024 * 1024;
        }

        if let Some(path) = lookup("BRIEFLY_DATABASE_PATH") {
            config.storage.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("BRIEFLY_UPLOAD_DIR") {
            config.storage.upload_dir = PathBuf::from(dir);
        }

        if let Some(model_id) = lookup("BRIEFLY_MODEL_ID") {
            config.summarizer.model_id = model_id;
        }
        if let Some(prefix) = lookup("BRIEFLY_MODEL_PREFIX") {
            config.summarizer.prefix = prefix;
        }
        if let Some(dir) = lookup("BRIEFLY_MODEL_CACHE_DIR") {
            config.summarizer.cache_dir = Some(PathBuf::from(dir));
        }
        parse_into(&lookup, "BRIEFLY_CHUNK_WORDS", &mut config.summarizer.chunk_words)?;
        parse_into(&lookup, "BRIEFLY_NUM_BEAMS", &mut config.summarizer.num_beams)?;
        if let Some(device) = lookup("BRIEFLY_DEVICE") {
            config.summarizer.device = device.parse()?;
        }

        if let Some(url) = lookup("BRIEFLY_TRANSCRIPT_URL") {
            config.transcript.watch_url = url;
        }
        if let Some(url) = lookup("BRIEFLY_TRANSLATE_URL") {
            config.translation.endpoint = url;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "BRIEFLY_HTTP_TIMEOUT_SECS")? {
            config.transcript.timeout_secs = secs;
            config.translation.timeout_secs = secs;
        }

        config.auth.secret_key = lookup("BRIEFLY_SECRET_KEY");
        parse_into(&lookup, "BRIEFLY_SESSION_TTL_SECS", &mut config.auth.session_ttl_secs)?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.summarizer.chunk_words == 0 {
            return Err(BrieflyError::Config("chunk_words must be greater than 0".to_string()));
        }
        if self.summarizer.num_beams == 0 {
            return Err(BrieflyError::Config("num_beams must be greater than 0".to_string()));
        }
        if self.summarizer.max_input_tokens < 2 || self.summarizer.max_output_tokens < 2 {
            return Err(BrieflyError::Config("token caps must be at least 2".to_string()));
        }
        if self.auth.session_ttl_secs <= 0 {
            return Err(BrieflyError::Config("session_ttl_secs must be positive".to_string()));
        }
        if self.auth.secret_key.is_some() {
            self.auth.require_secret()?;
        }
        Ok(())
    }

    /// Socket address string for the HTTP server
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| BrieflyError::Config(format!("Failed to parse {}: {}", key, e))),
    }
}

fn parse_into<T, F>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = parse_var(lookup, key)? {
        *target = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_generation_contract() {
        let config = Config::default();
        assert_eq!(config.summarizer.chunk_words, 500);
        assert_eq!(config.summarizer.max_input_tokens, 512);
        assert_eq!(config.summarizer.max_output_tokens, 150);
        assert_eq!(config.summarizer.num_beams, 4);
        assert!(config.summarizer.early_stopping);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("BRIEFLY_PORT", "8080"),
            ("BRIEFLY_CHUNK_WORDS", "200"),
            ("BRIEFLY_DATABASE_PATH", "/tmp/users.db"),
            ("BRIEFLY_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.summarizer.chunk_words, 200);
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/users.db"));
        assert_eq!(config.transcript.timeout_secs, 5);
        assert_eq!(config.translation.timeout_secs, 5);
        assert_eq!(config.server_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("BRIEFLY_PORT", "not-a-port")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("BRIEFLY_CHUNK_WORDS", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("BRIEFLY_SECRET_KEY", "short")])).is_err());
    }

    #[test]
    fn test_secret_is_optional_until_required() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.auth.require_secret().is_err());

        let secret = "a".repeat(MIN_SECRET_LENGTH);
        let config = Config::from_lookup(lookup_from(&[("BRIEFLY_SECRET_KEY", secret.as_str())])).unwrap();
        assert_eq!(config.auth.require_secret().unwrap(), secret);
    }
}
