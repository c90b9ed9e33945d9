use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Runtime configuration, loaded once at startup from a JSON file.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bot_token: String,
    /// Restricts polling-mode forwarding to a single private chat.
    /// 0 accepts any private conversation.
    #[serde(default)]
    pub source_chat_id: i64,
    pub target_chat_id: i64,
    #[serde(default)]
    pub webhook_mode: bool,
    #[serde(default)]
    pub debug: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}
