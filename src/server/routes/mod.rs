//! HTTP routes

pub mod auth;
pub mod summary;
pub mod video;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::server::error::ApiResult;
use crate::server::session::CurrentSession;
use crate::server::state::AppState;

/// Build all routes
pub fn app_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/contact", get(contact))
        .route("/text", get(summary::summary_form))
        .route(
            "/summary",
            post(summary::summarize_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/video", get(video::video_form).post(video::summarize_video))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// GET / - login status of the session's user
async fn home(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<Value>> {
    let user = match session {
        Some(claims) => state.auth().user_for_session(&claims).await?,
        None => None,
    };

    Ok(match user {
        Some(user) => Json(json!({ "logged_in": true, "username": user.username })),
        None => Json(json!({ "logged_in": false })),
    })
}

/// GET /about - service description
async fn about() -> Json<Value> {
    Json(json!({
        "name": "briefly-rs",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Abstractive summaries of text, documents and YouTube videos, with Urdu translation",
        "endpoints": {
            "POST /summary": "Summarize pasted text or an uploaded .txt/.pdf file (multipart)",
            "POST /video": "Summarize a YouTube video transcript (form: youtube_link, transcript_lang)",
            "POST /register": "Create an account (form: username, email, password)",
            "POST /login": "Start a session (form: email, password)",
            "GET /logout": "End the session",
            "GET /contact": "Contact details",
        }
    }))
}

/// GET /contact
async fn contact() -> Json<Value> {
    Json(json!({
        "name": "briefly-rs",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "message": "Questions and feedback are welcome",
    }))
}
