//! Machine translation
//!
//! `Translator` is the narrow seam over an external translation service. Any service
//! error collapses to `BrieflyError::Translation`.

use crate::config::TranslationConfig;
use crate::error::{BrieflyError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Transcript languages translated to English before summarization
pub const INBOUND_LANGUAGES: [&str; 2] = ["hi", "ur"];

/// Language of every summary
pub const SUMMARY_LANGUAGE: &str = "en";

/// Language summaries are additionally translated into
pub const OUTBOUND_LANGUAGE: &str = "ur";

/// Whether a transcript in `lang` is translated to English first
pub fn needs_inbound_translation(lang: &str) -> bool {
    INBOUND_LANGUAGES.contains(&lang)
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, src: &str, dst: &str) -> Result<String>;
}

/// Client for the public Google Translate `translate_a/single` endpoint
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn request(&self, text: &str, src: &str, dst: &str) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", src), ("tl", dst), ("dt", "t")])
            .form(&[("q", text)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, src: &str, dst: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        log::debug!("Translating {} characters {} -> {}", text.len(), src, dst);
        let body = self.request(text, src, dst).await.map_err(|e| {
            log::warn!("Translation request {} -> {} failed: {}", src, dst, e);
            BrieflyError::Translation(format!("Translation service unavailable ({} -> {})", src, dst))
        })?;

        parse_translation(&body)
    }
}

/// Concatenate the translated fragments of a `translate_a/single` response.
///
/// The body looks like `[[["translated", "original", ...], ...], ...]`.
fn parse_translation(body: &Value) -> Result<String> {
    let sentences = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| BrieflyError::Translation("Unexpected translation response".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(BrieflyError::Translation(
            "Translation response contained no text".to_string(),
        ));
    }
    Ok(translated)
}
