//! HTTP tests for the web application
//!
//! The router runs in-process with a stub summarization model, transcript source and
//! translator, and an in-memory users database.

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use briefly_rs::storage::Database;
use briefly_rs::video::TranscriptSegment;
use briefly_rs::{
    BrieflyError, BrieflyServer, Config, Result, Services, SummaryModel, TranscriptSource,
    Translator,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "an-integration-test-secret-of-sufficient-length";
const VIDEO_URL: &str = "https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ";

/// Keeps the first three words of every chunk
struct FirstWordsModel;

impl SummaryModel for FirstWordsModel {
    fn summarize_chunk(&self, chunk: &str) -> Result<String> {
        Ok(chunk.split_whitespace().take(3).collect::<Vec<_>>().join(" "))
    }
}

struct StubTranscripts;

#[async_trait]
impl TranscriptSource for StubTranscripts {
    async fn fetch_transcript(&self, video_id: &str, _lang: &str) -> Result<Vec<TranscriptSegment>> {
        if video_id != "dQw4w9WgXcQ" {
            return Err(BrieflyError::Transcript("Transcripts are disabled".to_string()));
        }
        Ok(vec![
            TranscriptSegment {
                text: "never gonna give".to_string(),
                start: 0.0,
                duration: 2.0,
            },
            TranscriptSegment {
                text: "you up".to_string(),
                start: 2.0,
                duration: 1.5,
            },
        ])
    }
}

struct TaggingTranslator;

#[async_trait]
impl Translator for TaggingTranslator {
    async fn translate(&self, text: &str, _src: &str, dst: &str) -> Result<String> {
        Ok(format!("[{}] {}", dst, text))
    }
}

fn test_app(dir: &TempDir) -> Router {
    let mut config = Config::default();
    config.auth.secret_key = Some(SECRET.to_string());
    config.auth.pbkdf2_iterations = 1_000;
    config.storage.upload_dir = dir.path().join("uploads");

    let services = Services {
        model: Arc::new(FirstWordsModel),
        transcripts: Arc::new(StubTranscripts),
        translator: Arc::new(TaggingTranslator),
        database: Database::memory().unwrap(),
    };

    BrieflyServer::with_services(config, services).unwrap().router()
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let boundary = "briefly-test-boundary";
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            }
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/summary")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn session_cookie(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let response = test_app(&dir).oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_register_login_logout() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let registration = "username=ayesha&email=ayesha%40example.com&password=hunter22";

    let response = app.clone().oneshot(form("/register", registration)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Registration successful, please log in");
    assert_eq!(body["user"]["username"], "ayesha");
    assert!(body["user"].get("password_hash").is_none());

    let response = app.clone().oneshot(form("/register", registration)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "Username or email already exists");

    let response = app
        .clone()
        .oneshot(form("/login", "email=ayesha%40example.com&password=wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["error"],
        "Login unsuccessful. Please check your email and password"
    );

    let response = app
        .clone()
        .oneshot(form("/login", "email=ayesha%40example.com&password=hunter22"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("session="));
    assert_eq!(json_body(response).await["message"], "Login successful!");

    let home = json_body(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert_eq!(home["logged_in"], true);
    assert_eq!(home["username"], "ayesha");

    let anonymous = json_body(app.clone().oneshot(get("/", None)).await.unwrap()).await;
    assert_eq!(anonymous["logged_in"], false);

    let response = app.clone().oneshot(get("/logout", Some(&cookie))).await.unwrap();
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_forged_cookie_is_anonymous() {
    let dir = TempDir::new().unwrap();
    let response = test_app(&dir)
        .oneshot(get("/", Some("session=not.a.token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["logged_in"], false);
}

#[tokio::test]
async fn test_summary_requires_input() {
    let dir = TempDir::new().unwrap();
    let response = test_app(&dir)
        .oneshot(multipart(&[("text", None, b"   ")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Please provide some text or upload a file."
    );
}

#[tokio::test]
async fn test_summary_of_pasted_text() {
    let dir = TempDir::new().unwrap();
    let response = test_app(&dir)
        .oneshot(multipart(&[("text", None, b"one two three four five")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["summary"], "one two three");
    assert_eq!(body["origin"], "pasted_text");
}

#[tokio::test]
async fn test_uploaded_file_replaces_text() {
    let dir = TempDir::new().unwrap();
    let response = test_app(&dir)
        .oneshot(multipart(&[
            ("text", None, b"ignored pasted text"),
            ("file", Some("notes.txt"), b"alpha beta gamma delta"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["text"], "alpha beta gamma delta");
    assert_eq!(body["summary"], "alpha beta gamma");
    assert_eq!(body["origin"], "upload");
}

#[tokio::test]
async fn test_unreadable_pdf() {
    let dir = TempDir::new().unwrap();
    let response = test_app(&dir)
        .oneshot(multipart(&[("file", Some("paper.pdf"), b"garbage")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_video_summary() {
    let dir = TempDir::new().unwrap();
    let body = format!("youtube_link={}&transcript_lang=en", VIDEO_URL);
    let response = test_app(&dir).oneshot(form("/video", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["video_id"], "dQw4w9WgXcQ");
    assert_eq!(body["summary"], "<ul><li>never gonna give</li></ul>");
    assert_eq!(body["urdu_summary"], "<ul><li>[ur] never gonna give</li></ul>");
}

#[tokio::test]
async fn test_video_errors() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(form("/video", "youtube_link=not-a-video"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid YouTube URL");

    let response = app
        .oneshot(form(
            "/video",
            "youtube_link=https%3A%2F%2Fyoutu.be%2FAAAAAAAAAAA&transcript_lang=en",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Error fetching transcript");
}

#[tokio::test]
async fn test_missing_video_link() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(form("/video", "transcript_lang=en"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid YouTube URL");
}

#[tokio::test]
async fn test_malformed_forms_get_json_errors() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(form("/login", "password=hunter22"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("email"));

    let response = app
        .clone()
        .oneshot(form("/register", "username=ana"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json_body(response).await["error"].is_string());

    let response = app
        .oneshot(form("/summary", "input_text=hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_informational_routes() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    for uri in ["/about", "/contact", "/text", "/video", "/register", "/login"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
    }
}

#[tokio::test]
async fn test_missing_secret_is_rejected() {
    let services = Services {
        model: Arc::new(FirstWordsModel),
        transcripts: Arc::new(StubTranscripts),
        translator: Arc::new(TaggingTranslator),
        database: Database::memory().unwrap(),
    };

    match BrieflyServer::with_services(Config::default(), services) {
        Err(BrieflyError::Config(msg)) => assert!(msg.contains("BRIEFLY_SECRET_KEY")),
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("server started without a secret"),
    }
}
