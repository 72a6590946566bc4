//! End-to-end summarization pipelines with stand-in model and network services

use async_trait::async_trait;
use briefly_rs::api::{DocumentOrigin, DocumentSummarizer, Upload, VideoSummarizer, VideoSummaryError};
use briefly_rs::text::extract_from_path;
use briefly_rs::video::{TranscriptFetcher, TranscriptSegment};
use briefly_rs::{BrieflyError, Result, Summarizer, SummaryModel, TranscriptSource, Translator};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Records the size of every chunk it is handed and labels its output with the chunk number
#[derive(Default)]
struct RecordingModel {
    chunk_sizes: Mutex<Vec<usize>>,
}

impl SummaryModel for RecordingModel {
    fn summarize_chunk(&self, chunk: &str) -> Result<String> {
        let mut sizes = self.chunk_sizes.lock().unwrap();
        sizes.push(chunk.split_whitespace().count());
        Ok(format!("part{}", sizes.len()))
    }
}

struct ScriptedTranscripts(Vec<&'static str>);

#[async_trait]
impl TranscriptSource for ScriptedTranscripts {
    async fn fetch_transcript(&self, _video_id: &str, _lang: &str) -> Result<Vec<TranscriptSegment>> {
        Ok(self
            .0
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptSegment {
                text: text.to_string(),
                start: i as f64,
                duration: 1.0,
            })
            .collect())
    }
}

/// Translates by prefixing the target language, and can be told to reject a direction
struct LabelTranslator {
    reject: Option<(&'static str, &'static str)>,
}

#[async_trait]
impl Translator for LabelTranslator {
    async fn translate(&self, text: &str, src: &str, dst: &str) -> Result<String> {
        if self.reject == Some((src, dst)) {
            return Err(BrieflyError::Translation("quota exceeded".to_string()));
        }
        Ok(format!("{}: {}", dst, text))
    }
}

fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
}

#[tokio::test]
async fn test_long_document_is_summarized_in_order() {
    let dir = TempDir::new().unwrap();
    let model = Arc::new(RecordingModel::default());
    let documents = DocumentSummarizer::new(Summarizer::new(model.clone()), dir.path().join("uploads"));

    let result = documents.summarize(Some(words(1200)), None).await.unwrap();

    assert_eq!(*model.chunk_sizes.lock().unwrap(), vec![500, 500, 200]);
    assert_eq!(result.summary, "part1 part2 part3");
    assert_eq!(result.origin, DocumentOrigin::PastedText);
}

#[tokio::test]
async fn test_text_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("article.txt");
    std::fs::write(&path, "\u{feff}Line one\r\nLine two").unwrap();

    let text = extract_from_path(&path).unwrap();
    assert_eq!(text, "Line one\nLine two");

    let model = Arc::new(RecordingModel::default());
    let documents = DocumentSummarizer::new(Summarizer::new(model.clone()), dir.path().join("uploads"));
    let upload = Upload {
        file_name: "article.txt".to_string(),
        bytes: std::fs::read(&path).unwrap(),
    };

    let result = documents.summarize(None, Some(upload)).await.unwrap();
    assert_eq!(result.summary, "part1");
    assert_eq!(result.origin, DocumentOrigin::Upload);
    assert_eq!(*model.chunk_sizes.lock().unwrap(), vec![4]);
}

#[tokio::test]
async fn test_urdu_video_round_trip() {
    let model = Arc::new(RecordingModel::default());
    let videos = VideoSummarizer::new(
        TranscriptFetcher::new(Arc::new(ScriptedTranscripts(vec!["aap kaise", "hain"]))),
        Arc::new(LabelTranslator { reject: None }),
        Summarizer::new(model.clone()),
    );

    let result = videos
        .summarize("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42", "ur")
        .await
        .unwrap();

    // "en: aap kaise hain" is four words and fits in one chunk
    assert_eq!(*model.chunk_sizes.lock().unwrap(), vec![4]);
    assert_eq!(result.video_id, "dQw4w9WgXcQ");
    assert_eq!(result.summary, "<ul><li>part1</li></ul>");
    assert_eq!(result.urdu_summary, "<ul><li>ur: part1</li></ul>");
}

#[tokio::test]
async fn test_failed_urdu_translation() {
    let videos = VideoSummarizer::new(
        TranscriptFetcher::new(Arc::new(ScriptedTranscripts(vec!["hello there"]))),
        Arc::new(LabelTranslator {
            reject: Some(("en", "ur")),
        }),
        Summarizer::new(Arc::new(RecordingModel::default())),
    );

    let err = videos
        .summarize("https://youtu.be/dQw4w9WgXcQ", "en")
        .await
        .unwrap_err();
    assert_eq!(err, VideoSummaryError::SummaryFailed);
}

#[tokio::test]
async fn test_empty_transcript() {
    let model = Arc::new(RecordingModel::default());
    let videos = VideoSummarizer::new(
        TranscriptFetcher::new(Arc::new(ScriptedTranscripts(vec![]))),
        Arc::new(LabelTranslator { reject: None }),
        Summarizer::new(model.clone()),
    );

    let err = videos
        .summarize("https://youtu.be/dQw4w9WgXcQ", "en")
        .await
        .unwrap_err();
    assert_eq!(err, VideoSummaryError::TranscriptUnavailable);
    assert!(model.chunk_sizes.lock().unwrap().is_empty());
}
