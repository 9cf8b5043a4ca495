use anyhow::Result;
use clap::{Arg, Command};
use std::sync::Arc;
use tracing::{info, warn};

use yt_transcript_rust::{ApiServer, Config, YoutubeCaptionSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("yt_transcript_rust=info,warn")
        .init();

    let matches = Command::new("YouTube Transcript Fetcher (Rust)")
        .version("0.1.0")
        .about("Caption service for fetching YouTube transcripts")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on (overrides config)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port.parse()?;
    }

    if matches.get_flag("verbose") {
        info!("Verbose logging enabled");
        info!("{}", config.summary());
    }

    config.validate()?;

    info!("🚀 YouTube Transcript Fetcher (Rust) starting...");

    let source = Arc::new(YoutubeCaptionSource::new(&config.fetcher)?);
    let server = ApiServer::new(source, Arc::new(config));

    server.start().await
}
