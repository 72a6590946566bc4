//! Video transcripts
//!
//! `TranscriptSource` talks to a caption provider. `TranscriptFetcher` sits in front of
//! it and collapses every failure (captions disabled, no track in the requested
//! language, network trouble) into `None`, logging which kind it was.

use crate::config::TranscriptConfig;
use crate::error::{BrieflyError, Result};
use crate::video::id::extract_video_id;
use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One caption line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Seconds from the start of the video
    pub start: f64,
    /// Seconds on screen
    pub duration: f64,
}

/// A provider of timed captions
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Captions of `video_id` in `lang`, in caption order
    async fn fetch_transcript(&self, video_id: &str, lang: &str) -> Result<Vec<TranscriptSegment>>;
}

/// Fetches transcripts by video URL
#[derive(Clone)]
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn TranscriptSource>) -> Self {
        Self { source }
    }

    /// Transcript of the video at `video_url` in `lang`, or `None` when the URL has no
    /// video id or the transcript cannot be retrieved
    pub async fn fetch(&self, video_url: &str, lang: &str) -> Option<Vec<TranscriptSegment>> {
        let video_id = extract_video_id(video_url)?;

        match self.source.fetch_transcript(&video_id, lang).await {
            Ok(segments) if segments.is_empty() => {
                log::warn!("Transcript for {} ({}) is empty", video_id, lang);
                None
            }
            Ok(segments) => {
                log::info!(
                    "Fetched {} transcript segments for {} ({})",
                    segments.len(),
                    video_id,
                    lang
                );
                Some(segments)
            }
            Err(e) => {
                log::warn!("Transcript unavailable for {} ({}): {}", video_id, lang, e);
                None
            }
        }
    }
}

/// Join segment texts with single spaces, in order
pub fn combine(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<&str>>()
        .join(" ")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsRenderer {
    player_captions_tracklist_renderer: Option<TrackList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackList {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    /// `asr` for auto-generated tracks
    #[serde(default)]
    kind: Option<String>,
}

/// Captions scraped from the YouTube watch page
pub struct YouTubeTranscriptSource {
    client: reqwest::Client,
    watch_url: String,
    accept_language: String,
}

impl YouTubeTranscriptSource {
    pub fn new(config: &TranscriptConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            watch_url: config.watch_url.clone(),
            accept_language: config.accept_language.clone(),
        })
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.watch_url)
            .query(&[("v", video_id)])
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptSource {
    async fn fetch_transcript(&self, video_id: &str, lang: &str) -> Result<Vec<TranscriptSegment>> {
        let page = self.fetch_watch_page(video_id).await?;
        let tracks = parse_caption_tracks(&page)?;
        let track = select_track(&tracks, lang).ok_or_else(|| {
            BrieflyError::Transcript(format!("No transcript found in language '{}'", lang))
        })?;
        log::debug!(
            "Using {} caption track '{}'",
            if track.kind.as_deref() == Some("asr") { "generated" } else { "manual" },
            track.language_code
        );

        let xml = self
            .client
            .get(&track.base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_timed_text(&xml)
    }
}

/// Read the caption track list embedded in a watch page
fn parse_caption_tracks(page: &str) -> Result<Vec<CaptionTrack>> {
    const MARKER: &str = "\"captions\":";

    let start = page.find(MARKER).ok_or_else(|| {
        BrieflyError::Transcript("Transcripts are disabled for this video".to_string())
    })?;

    // The renderer is one JSON value followed by more page script
    let mut values = serde_json::Deserializer::from_str(&page[start + MARKER.len()..])
        .into_iter::<CaptionsRenderer>();
    let renderer = values
        .next()
        .ok_or_else(|| BrieflyError::Transcript("Caption metadata is missing".to_string()))??;

    let tracks = renderer
        .player_captions_tracklist_renderer
        .map(|list| list.caption_tracks)
        .unwrap_or_default();
    if tracks.is_empty() {
        return Err(BrieflyError::Transcript(
            "Transcripts are disabled for this video".to_string(),
        ));
    }
    Ok(tracks)
}

/// Manually created track for `lang` first, then an auto-generated one
fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    let matching = || tracks.iter().filter(move |t| t.language_code == lang);
    matching()
        .find(|t| t.kind.as_deref() != Some("asr"))
        .or_else(|| matching().next())
}

/// Parse a timed text document into segments.
///
/// Only `<text>` elements with content become segments; empty or self-closing ones are
/// skipped. Markup nested inside a caption is dropped structurally, its text kept.
fn parse_timed_text(xml: &str) -> Result<Vec<TranscriptSegment>> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    // (start, duration, raw text) of the open <text> element
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) if e.local_name().as_ref() == b"text" => {
                current = Some((
                    read_seconds(&e, b"start")?,
                    read_seconds(&e, b"dur")?,
                    String::new(),
                ));
            }
            Event::Text(e) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    raw.push_str(&e.unescape().map_err(xml_error)?);
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    let text = decode_caption(&raw);
                    if !text.is_empty() {
                        segments.push(TranscriptSegment { text, start, duration });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(segments)
}

/// Caption text is entity-encoded once more inside the XML
fn decode_caption(raw: &str) -> String {
    let decoded = quick_xml::escape::unescape_with(raw, |entity| match entity {
        "nbsp" => Some(" "),
        other => quick_xml::escape::resolve_predefined_entity(other),
    });
    let text = match decoded {
        Ok(text) => text.into_owned(),
        // A bare '&' left after the XML pass is literal text
        Err(_) => raw.to_string(),
    };
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn read_seconds(element: &BytesStart<'_>, name: &[u8]) -> Result<f64> {
    let attribute = element.try_get_attribute(name).map_err(xml_error)?;
    match attribute {
        None => Ok(0.0),
        Some(attribute) => {
            let value = attribute.unescape_value().map_err(xml_error)?;
            value
                .trim()
                .parse()
                .map_err(|_| BrieflyError::Transcript(format!("Invalid caption timing '{}'", value)))
        }
    }
}

fn xml_error<E: std::fmt::Display>(err: E) -> BrieflyError {
    BrieflyError::Transcript(format!("Malformed timed text: {}", err))
}
