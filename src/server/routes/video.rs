//! Video summary endpoints

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::VideoSummary;
use crate::server::error::ApiResult;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VideoForm {
    /// Missing links are treated like unusable ones
    #[serde(default)]
    pub youtube_link: String,
    #[serde(default = "default_language")]
    pub transcript_lang: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// GET /video - fields accepted by POST /video
pub async fn video_form() -> Json<Value> {
    Json(json!({
        "action": "/video",
        "fields": ["youtube_link", "transcript_lang"],
        "translated_languages": crate::translate::INBOUND_LANGUAGES,
    }))
}

/// POST /video - summarize a video transcript
pub async fn summarize_video(
    State(state): State<AppState>,
    form: Result<Form<VideoForm>, FormRejection>,
) -> ApiResult<Json<VideoSummary>> {
    let Form(form) = form?;
    let lang = form.transcript_lang.trim();
    let summary = state.videos().summarize(form.youtube_link.trim(), lang).await?;
    Ok(Json(summary))
}
