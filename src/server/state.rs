//! Application state for the HTTP server

use crate::api::{DocumentSummarizer, VideoSummarizer};
use crate::auth::{AuthService, SessionManager};
use crate::config::Config;
use crate::error::{BrieflyError, Result};
use crate::ml::T5SummaryModel;
use crate::storage::Database;
use crate::summarizer::{SummaryModel, Summarizer};
use crate::translate::{GoogleTranslator, Translator};
use crate::video::{TranscriptFetcher, TranscriptSource, YouTubeTranscriptSource};
use std::sync::{Arc, Mutex};

/// External capabilities the server is assembled from
pub struct Services {
    pub model: Arc<dyn SummaryModel>,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub translator: Arc<dyn Translator>,
    pub database: Database,
}

impl Services {
    /// Load the summarization model, open the users database and create the HTTP clients
    pub async fn from_config(config: &Config) -> Result<Self> {
        let summarizer_config = config.summarizer.clone();
        let model = tokio::task::spawn_blocking(move || T5SummaryModel::load(&summarizer_config))
            .await
            .map_err(|e| BrieflyError::Generic(format!("Model loading task failed: {}", e)))??;

        let database = Database::new(&config.storage.database_path)?;
        log::info!(
            "Users database ready at {} ({} accounts)",
            config.storage.database_path.display(),
            database.user_count()?
        );

        Ok(Self {
            model: Arc::new(model),
            transcripts: Arc::new(YouTubeTranscriptSource::new(&config.transcript)?),
            translator: Arc::new(GoogleTranslator::new(&config.translation)?),
            database,
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    documents: DocumentSummarizer,
    videos: VideoSummarizer,
    auth: AuthService,
    sessions: SessionManager,
}

impl AppState {
    /// Wire the pipelines together. Requires a session secret.
    pub fn new(config: Config, services: Services) -> Result<Self> {
        let sessions = SessionManager::new(config.auth.require_secret()?, config.auth.session_ttl_secs);

        let summarizer = Summarizer::with_chunk_words(services.model, config.summarizer.chunk_words);
        let documents = DocumentSummarizer::new(summarizer.clone(), config.storage.upload_dir.clone());
        let videos = VideoSummarizer::new(
            TranscriptFetcher::new(services.transcripts),
            services.translator,
            summarizer,
        );
        let auth = AuthService::new(
            Arc::new(Mutex::new(services.database)),
            config.auth.pbkdf2_iterations,
        );

        log::info!("Application state initialized");
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                documents,
                videos,
                auth,
                sessions,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn documents(&self) -> &DocumentSummarizer {
        &self.inner.documents
    }

    pub fn videos(&self) -> &VideoSummarizer {
        &self.inner.videos
    }

    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }
}
