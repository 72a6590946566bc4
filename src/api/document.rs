//! Document summarization pipeline
//!
//! Pasted text or an uploaded `.txt`/`.pdf` file goes in, a combined summary comes out.
//! A readable upload replaces the pasted text.

use crate::error::{BrieflyError, Result};
use crate::summarizer::Summarizer;
use crate::text::{DocumentKind, extract_upload};
use serde::Serialize;
use std::path::PathBuf;

/// Message for requests with neither text nor a usable file
pub const EMPTY_INPUT: &str = "Please provide some text or upload a file.";

/// Where a document's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrigin {
    Upload,
    PastedText,
    Transcript,
}

/// Text living for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub origin: DocumentOrigin,
}

/// Summarize an already resolved document, keeping its text and origin
pub async fn summarize_document(summarizer: &Summarizer, document: Document) -> Result<DocumentSummary> {
    let summary = summarizer.summarize_blocking(document.text.clone()).await?;

    Ok(DocumentSummary {
        text: document.text,
        summary,
        origin: document.origin,
    })
}

/// A file received from the client
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub text: String,
    pub summary: String,
    pub origin: DocumentOrigin,
}

/// Summarizes pasted text and uploads
#[derive(Clone)]
pub struct DocumentSummarizer {
    summarizer: Summarizer,
    upload_dir: PathBuf,
}

impl DocumentSummarizer {
    pub fn new(summarizer: Summarizer, upload_dir: PathBuf) -> Self {
        Self {
            summarizer,
            upload_dir,
        }
    }

    /// Pick the request's document: a supported upload wins over pasted text.
    ///
    /// Uploads with other extensions are ignored. Empty input fails with
    /// `BrieflyError::InvalidInput` before any model work.
    pub async fn resolve(&self, text: Option<String>, upload: Option<Upload>) -> Result<Document> {
        let mut document = text.map(|text| Document {
            text,
            origin: DocumentOrigin::PastedText,
        });

        if let Some(upload) = upload.filter(|u| !u.file_name.is_empty()) {
            match DocumentKind::from_filename(&upload.file_name) {
                Some(kind) => {
                    log::info!(
                        "Extracting text from {} ({} bytes)",
                        crate::utils::sanitize_filename(&upload.file_name),
                        upload.bytes.len()
                    );
                    let upload_dir = self.upload_dir.clone();
                    let text = tokio::task::spawn_blocking(move || {
                        extract_upload(&upload_dir, kind, &upload.bytes)
                    })
                    .await
                    .map_err(|e| BrieflyError::Generic(format!("Extraction task failed: {}", e)))??;

                    document = Some(Document {
                        text,
                        origin: DocumentOrigin::Upload,
                    });
                }
                None => log::debug!("Ignoring upload with unsupported type: {}", upload.file_name),
            }
        }

        match document {
            Some(document) if !document.text.trim().is_empty() => Ok(document),
            _ => Err(BrieflyError::InvalidInput(EMPTY_INPUT.to_string())),
        }
    }

    /// Resolve the document and summarize it
    pub async fn summarize(&self, text: Option<String>, upload: Option<Upload>) -> Result<DocumentSummary> {
        let document = self.resolve(text, upload).await?;
        summarize_document(&self.summarizer, document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::SummaryModel;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingModel {
        calls: AtomicUsize,
    }

    impl SummaryModel for CountingModel {
        fn summarize_chunk(&self, chunk: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("summary of {} words", chunk.split_whitespace().count()))
        }
    }

    fn pipeline(dir: &TempDir) -> (DocumentSummarizer, Arc<CountingModel>) {
        let model = Arc::new(CountingModel::default());
        let summarizer = Summarizer::new(model.clone());
        (
            DocumentSummarizer::new(summarizer, dir.path().join("uploads")),
            model,
        )
    }

    fn upload(name: &str, bytes: &[u8]) -> Option<Upload> {
        Some(Upload {
            file_name: name.to_string(),
            bytes: bytes.to_vec(),
        })
    }

    #[tokio::test]
    async fn test_pasted_text() {
        let dir = TempDir::new().unwrap();
        let (pipeline, model) = pipeline(&dir);

        let result = pipeline
            .summarize(Some("three little words".to_string()), None)
            .await
            .unwrap();

        assert_eq!(result.summary, "summary of 3 words");
        assert_eq!(result.origin, DocumentOrigin::PastedText);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transcript_document_keeps_origin() {
        let model = Arc::new(CountingModel::default());
        let summarizer = Summarizer::new(model.clone());
        let document = Document {
            text: "words spoken in a video".to_string(),
            origin: DocumentOrigin::Transcript,
        };

        let result = summarize_document(&summarizer, document).await.unwrap();

        assert_eq!(result.origin, DocumentOrigin::Transcript);
        assert_eq!(result.text, "words spoken in a video");
        assert_eq!(result.summary, "summary of 5 words");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_input_rejected_before_model() {
        let dir = TempDir::new().unwrap();
        let (pipeline, model) = pipeline(&dir);

        for text in [None, Some(String::new()), Some("  \n\t ".to_string())] {
            match pipeline.summarize(text, None).await {
                Err(BrieflyError::InvalidInput(message)) => assert_eq!(message, EMPTY_INPUT),
                other => panic!("expected input error, got {:?}", other.map(|s| s.summary)),
            }
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upload_overrides_text() {
        let dir = TempDir::new().unwrap();
        let (pipeline, _) = pipeline(&dir);

        let document = pipeline
            .resolve(Some("pasted".to_string()), upload("notes.txt", b"from the file"))
            .await
            .unwrap();

        assert_eq!(document.text, "from the file");
        assert_eq!(document.origin, DocumentOrigin::Upload);
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_ignored() {
        let dir = TempDir::new().unwrap();
        let (pipeline, _) = pipeline(&dir);

        let document = pipeline
            .resolve(Some("pasted".to_string()), upload("image.png", b"\x89PNG"))
            .await
            .unwrap();
        assert_eq!(document.origin, DocumentOrigin::PastedText);

        let empty_name = pipeline
            .resolve(Some("pasted".to_string()), upload("", b""))
            .await
            .unwrap();
        assert_eq!(empty_name.text, "pasted");
    }

    #[tokio::test]
    async fn test_unreadable_upload_is_extraction_failure() {
        let dir = TempDir::new().unwrap();
        let (pipeline, model) = pipeline(&dir);

        let pdf = pipeline.resolve(None, upload("broken.pdf", b"not a pdf")).await;
        assert!(matches!(pdf, Err(BrieflyError::Pdf(_))));

        let txt = pipeline.resolve(None, upload("latin1.txt", &[0x63, 0x61, 0x66, 0xe9])).await;
        assert!(matches!(txt, Err(BrieflyError::Extraction(_))));

        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        let leftovers = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
