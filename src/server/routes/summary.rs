//! Document summary endpoints

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use serde_json::{Value, json};

use crate::api::{DocumentSummary, Upload};
use crate::server::error::ApiResult;
use crate::server::state::AppState;

/// GET /text - fields accepted by POST /summary
pub async fn summary_form() -> Json<Value> {
    Json(json!({
        "action": "/summary",
        "encoding": "multipart/form-data",
        "fields": ["text", "file"],
        "accepted_files": [".txt", ".pdf"],
    }))
}

/// POST /summary - summarize pasted text or an uploaded file
pub async fn summarize_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<DocumentSummary>> {
    let mut multipart = multipart?;
    let mut text = None;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "text" => text = Some(field.text().await?),
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await?;
                upload = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            other => log::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let result = state.documents().summarize(text, upload).await?;
    log::info!(
        "Summarized {} characters into {}",
        result.text.len(),
        result.summary.len()
    );
    Ok(Json(result))
}
