//! briefly-rs CLI application
//!
//! Runs the web server, or summarizes a document or video from the command line.

use anyhow::{Context, bail};
use briefly_rs::api::{DocumentSummarizer, Upload, VideoSummarizer};
use briefly_rs::video::TranscriptFetcher;
use briefly_rs::{
    BrieflyServer, Config, GoogleTranslator, Summarizer, T5SummaryModel, YouTubeTranscriptSource,
};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "briefly-rs")]
#[command(about = "Summarize text, documents and YouTube videos with a local T5 model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web application
    Serve {
        /// Interface to bind (overrides BRIEFLY_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides BRIEFLY_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Summarize pasted text or a .txt/.pdf file
    Summarize {
        /// Text to summarize
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Document to summarize
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Summarize a YouTube video and translate the summary to Urdu
    Video {
        /// YouTube link
        url: String,

        /// Transcript language
        #[arg(short, long, default_value = "en")]
        lang: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve_command(config).await?;
        }
        Commands::Summarize { text, file } => {
            summarize_command(config, text, file).await?;
        }
        Commands::Video { url, lang } => {
            video_command(config, url, lang).await?;
        }
    }

    Ok(())
}

async fn serve_command(config: Config) -> anyhow::Result<()> {
    let spinner = spinner("Loading summarization model...");
    let server = BrieflyServer::new(config).await;
    spinner.finish_and_clear();

    server?.start().await?;
    Ok(())
}

async fn summarize_command(
    config: Config,
    text: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let upload = match file {
        Some(path) => {
            if !path.exists() {
                bail!("File not found: {}", path.display());
            }
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(Upload { file_name, bytes })
        }
        None => None,
    };

    let summarizer = load_summarizer(&config).await?;
    let documents = DocumentSummarizer::new(summarizer, config.storage.upload_dir.clone());

    let spinner = spinner("Summarizing...");
    let result = documents.summarize(text, upload).await;
    spinner.finish_and_clear();
    let result = result?;

    println!("Summary ({} words in):", result.text.split_whitespace().count());
    println!();
    println!("{}", result.summary);

    Ok(())
}

async fn video_command(config: Config, url: String, lang: String) -> anyhow::Result<()> {
    let summarizer = load_summarizer(&config).await?;
    let videos = VideoSummarizer::new(
        TranscriptFetcher::new(Arc::new(YouTubeTranscriptSource::new(&config.transcript)?)),
        Arc::new(GoogleTranslator::new(&config.translation)?),
        summarizer,
    );

    let spinner = spinner("Fetching transcript and summarizing...");
    let result = videos.summarize(&url, &lang).await;
    spinner.finish_and_clear();
    let result = result?;

    println!("Video: {}", result.video_id);
    println!();
    println!("{}", result.summary);
    println!();
    println!("{}", result.urdu_summary);

    Ok(())
}

async fn load_summarizer(config: &Config) -> anyhow::Result<Summarizer> {
    let spinner = spinner(&format!("Loading {}...", config.summarizer.model_id));
    let summarizer_config = config.summarizer.clone();
    let model = tokio::task::spawn_blocking(move || T5SummaryModel::load(&summarizer_config)).await;
    spinner.finish_and_clear();

    let model = model.context("Model loading task failed")??;
    Ok(Summarizer::with_chunk_words(
        Arc::new(model),
        config.summarizer.chunk_words,
    ))
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
