//! Video summarization pipeline
//!
//! URL → transcript → (English) summary → Urdu translation, with both summaries
//! rendered as bullet lists.

use crate::api::document::{Document, DocumentOrigin, summarize_document};
use crate::present::to_html_bullets;
use crate::summarizer::Summarizer;
use crate::translate::{OUTBOUND_LANGUAGE, SUMMARY_LANGUAGE, Translator, needs_inbound_translation};
use crate::video::{TranscriptFetcher, combine, extract_video_id};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// The three outcomes a video request can fail with
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSummaryError {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Error fetching transcript")]
    TranscriptUnavailable,

    #[error("Error generating summary")]
    SummaryFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    /// English summary as a bullet list
    pub summary: String,
    /// Urdu summary as a bullet list
    pub urdu_summary: String,
}

#[derive(Clone)]
pub struct VideoSummarizer {
    fetcher: TranscriptFetcher,
    translator: Arc<dyn Translator>,
    summarizer: Summarizer,
}

impl VideoSummarizer {
    pub fn new(fetcher: TranscriptFetcher, translator: Arc<dyn Translator>, summarizer: Summarizer) -> Self {
        Self {
            fetcher,
            translator,
            summarizer,
        }
    }

    pub async fn summarize(
        &self,
        video_url: &str,
        lang: &str,
    ) -> std::result::Result<VideoSummary, VideoSummaryError> {
        let video_id = extract_video_id(video_url).ok_or(VideoSummaryError::InvalidUrl)?;
        log::info!("Summarizing video {} (transcript language: {})", video_id, lang);

        let segments = self
            .fetcher
            .fetch(video_url, lang)
            .await
            .ok_or(VideoSummaryError::TranscriptUnavailable)?;
        let mut transcript = combine(&segments);

        if needs_inbound_translation(lang) {
            transcript = self
                .translator
                .translate(&transcript, lang, SUMMARY_LANGUAGE)
                .await
                .map_err(|e| {
                    log::warn!("Transcript translation failed for {}: {}", video_id, e);
                    VideoSummaryError::TranscriptUnavailable
                })?;
        }
        if transcript.trim().is_empty() {
            return Err(VideoSummaryError::TranscriptUnavailable);
        }

        let document = Document {
            text: transcript,
            origin: DocumentOrigin::Transcript,
        };
        let summary = summarize_document(&self.summarizer, document)
            .await
            .map_err(|e| {
                log::error!("Summarization failed for {}: {}", video_id, e);
                VideoSummaryError::SummaryFailed
            })?
            .summary;
        if summary.trim().is_empty() {
            return Err(VideoSummaryError::SummaryFailed);
        }

        let urdu = self
            .translator
            .translate(&summary, SUMMARY_LANGUAGE, OUTBOUND_LANGUAGE)
            .await
            .map_err(|e| {
                log::warn!("Summary translation failed for {}: {}", video_id, e);
                VideoSummaryError::SummaryFailed
            })?;

        Ok(VideoSummary {
            video_id,
            summary: to_html_bullets(&summary),
            urdu_summary: to_html_bullets(&urdu),
        })
    }
}
