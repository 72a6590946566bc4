//! Video transcripts for briefly-rs
//!
//! Video id extraction from YouTube URLs and transcript retrieval.

pub mod id;
pub mod transcript;

// Re-export main types and functions
pub use id::extract_video_id;
pub use transcript::{
    TranscriptFetcher, TranscriptSegment, TranscriptSource, YouTubeTranscriptSource, combine,
};
