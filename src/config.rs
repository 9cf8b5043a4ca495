use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the transcript fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Caption retrieval settings
    pub fetcher: FetcherConfig,

    /// Fetch history settings
    pub history: HistoryConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Read-aloud settings
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the caption service on
    pub bind_address: String,

    /// Port to listen on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Preferred caption language code
    pub language: String,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,

    /// User agent sent to YouTube
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Path of the persisted history file
    pub file: PathBuf,

    /// Maximum number of retained entries
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default filename for TXT export
    pub txt_filename: String,

    /// Default filename for PDF export
    pub pdf_filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// External text-to-speech command
    pub command: String,

    /// Extra arguments passed before the text
    pub args: Vec<String>,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        // Try to load from various locations
        let config_paths = [
            "yt-transcript.toml",
            "config/yt-transcript.toml",
            "~/.config/yt-transcript/config.toml",
            "/etc/yt-transcript/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        // Try environment variables
        if let Ok(config) = Self::from_env() {
            return Ok(config);
        }

        Err(anyhow!("No configuration file found"))
    }

    /// Load a specific configuration file
    pub fn load_from(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read config file {}: {}", path, e))?;
        let config = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Cannot parse config file {}: {}", path, e))?;
        tracing::info!("📄 Loaded configuration from: {}", path);
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Override with environment variables
        if let Ok(port) = std::env::var("YT_TRANSCRIPT_PORT") {
            config.server.port = port.parse().unwrap_or(5000);
        }

        if let Ok(language) = std::env::var("YT_TRANSCRIPT_LANGUAGE") {
            config.fetcher.language = language;
        }

        if let Ok(history_file) = std::env::var("YT_TRANSCRIPT_HISTORY_FILE") {
            config.history.file = PathBuf::from(history_file);
        }

        if let Ok(command) = std::env::var("YT_TRANSCRIPT_SPEECH_COMMAND") {
            config.speech.command = command;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("server port must be greater than 0"));
        }

        if self.fetcher.timeout_seconds == 0 {
            return Err(anyhow!("fetcher timeout must be greater than 0"));
        }

        if self.history.max_entries == 0 {
            return Err(anyhow!("history max_entries must be greater than 0"));
        }

        if self.speech.command.is_empty() {
            return Err(anyhow!("speech command must not be empty"));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "YouTube Transcript Fetcher Configuration:\n\
            - Bind: {}:{}\n\
            - Caption Language: {}\n\
            - Fetch Timeout: {}s\n\
            - History File: {}\n\
            - History Limit: {}\n\
            - Speech Command: {}",
            self.server.bind_address,
            self.server.port,
            self.fetcher.language,
            self.fetcher.timeout_seconds,
            self.history.file.display(),
            self.history.max_entries,
            self.speech.command
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            fetcher: FetcherConfig::default(),
            history: HistoryConfig::default(),
            export: ExportConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("transcript-history.json"),
            max_entries: 5,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            txt_filename: "transcript.txt".to_string(),
            pdf_filename: "transcript.pdf".to_string(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            command: "espeak".to_string(),
            args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.fetcher.language, "en");
        assert_eq!(config.history.max_entries, 5);
        assert_eq!(config.export.txt_filename, "transcript.txt");
        assert_eq!(config.export.pdf_filename, "transcript.pdf");
        assert_eq!(config.speech.command, "espeak");
    }

    #[test]
    fn test_validation_passes_for_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.fetcher.language, config.fetcher.language);
        assert_eq!(parsed.history.file, config.history.file);
    }
}
