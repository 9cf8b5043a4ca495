use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use yt_transcript_rust::{CommandSpeech, Config, HistoryStore, TranscriptSession};

#[derive(Parser)]
#[command(name = "transcript-cli")]
#[command(about = "Fetch, search, export, and read aloud YouTube transcripts")]
struct Cli {
    /// Base URL of the caption service
    #[arg(long, default_value = "http://localhost:5000")]
    server: String,

    /// YouTube video ID to fetch
    #[arg(long)]
    video_id: Option<String>,

    /// Show only caption lines containing this term (case-insensitive)
    #[arg(long)]
    search: Option<String>,

    /// Save the transcript as plain text to this path
    #[arg(long)]
    txt: Option<PathBuf>,

    /// Save the transcript as a PDF to this path
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Read the transcript aloud
    #[arg(long)]
    speak: bool,

    /// Print the fetch history and exit
    #[arg(long)]
    show_history: bool,

    /// Path of the history file
    #[arg(long)]
    history_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("yt_transcript_rust=info,warn")
        .init();

    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    let history_file = cli.history_file.unwrap_or_else(|| config.history.file.clone());
    let history_store = HistoryStore::with_max_entries(history_file, config.history.max_entries);
    let speech = Box::new(CommandSpeech::new(&config.speech));

    let mut session = TranscriptSession::new(cli.server, history_store, speech).await;
    session.set_language(config.fetcher.language.clone());

    if cli.show_history {
        if session.history().is_empty() {
            info!("📭 No fetch history found");
            return Ok(());
        }

        info!("📚 Last {} fetched transcripts:", session.history().len());
        for entry in session.history() {
            info!("  {} - {} lines", entry.video_id, entry.transcript.len());
        }
        return Ok(());
    }

    let video_id = match cli.video_id {
        Some(id) => id,
        None => {
            warn!("No video ID given; use --video-id or --show-history");
            return Ok(());
        }
    };

    session.set_video_id(video_id);
    session.fetch_transcript().await;

    if let Some(error) = session.error() {
        warn!("⚠️ {}", error);
        return Ok(());
    }

    if let Some(term) = cli.search {
        session.set_search_term(term);
    }

    for entry in session.visible_entries() {
        println!("[{:8.2}s] {}", entry.start, entry.text);
    }

    if let Some(path) = cli.txt {
        session.download_txt(&path).await?;
    }

    if let Some(path) = cli.pdf {
        session.download_pdf(&path).await?;
    }

    if let Some(error) = session.error() {
        warn!("⚠️ {}", error);
    }

    if cli.speak {
        session.speak().await?;
        info!("🔊 Speaking transcript, press Enter to stop...");

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        session.stop_speech().await?;
    }

    Ok(())
}
