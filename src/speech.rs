/// Read-aloud support
///
/// Speech synthesis is delegated to an external engine; this module only
/// defines the seam and a process-spawning implementation. Cancelling stops
/// everything in flight, there is no queueing or resumption of our own.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Child;
use tracing::{debug, warn};

use crate::config::SpeechConfig;

/// Text-to-speech collaborator
#[async_trait]
pub trait SpeechSynthesizer: Send {
    /// Start speaking the given text
    async fn speak(&mut self, text: &str) -> Result<()>;

    /// Cancel any pending or playing speech
    async fn cancel(&mut self) -> Result<()>;
}

/// Speech synthesizer backed by an external TTS command
pub struct CommandSpeech {
    command: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSpeech {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            child: None,
        }
    }

    /// Whether a synthesis process is currently alive
    pub fn is_speaking(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSpeech {
    async fn speak(&mut self, text: &str) -> Result<()> {
        // One utterance at a time
        self.cancel().await?;

        debug!("Spawning speech synthesis command: {}", self.command);
        let child = tokio::process::Command::new(&self.command)
            .args(&self.args)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| anyhow!("Failed to start speech command '{}': {}", self.command, e))?;

        self.child = Some(child);
        Ok(())
    }

    async fn cancel(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                warn!("Failed to stop speech process: {}", e);
            }
        }
        Ok(())
    }
}
