use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Environment variable that overrides the configured gateway API key.
pub const API_KEY_ENV: &str = "MUSTASHAR_API_KEY";

/// Top-level configuration for the Mustashar application.
///
/// Loaded from `~/.mustashar/config.toml` by default. Each section
/// corresponds to a bounded context or cross-cutting concern. Gateway
/// credentials are resolved once at process start and read-only thereafter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MustasharConfig {
    pub general: GeneralConfig,
    pub chat: ChatConfig,
    pub speech: SpeechConfig,
    pub gateway: GatewayConfig,
}

impl MustasharConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MustasharConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Resolve the gateway API key.
    ///
    /// Priority: `MUSTASHAR_API_KEY` env var > config file value.
    pub fn resolve_api_key(&self) -> String {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => key,
            _ => self.gateway.api_key.clone(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Directory for synthesized audio files and other local artifacts.
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: "~/.mustashar/data".to_string(),
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of prior messages resent to the analysis gateway
    /// per turn. The full history is replayed on every request, so this
    /// bounds request growth in long conversations.
    pub history_limit: usize,
    /// Character count at or above which an answer is treated as likely
    /// truncated by the model's output budget.
    pub near_limit_chars: usize,
    /// Maximum accepted query length in characters.
    pub max_query_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: 20,
            near_limit_chars: 1800,
            max_query_chars: 2000,
        }
    }
}

/// Text-to-speech settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether the read-aloud feature is enabled.
    pub enabled: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Remote gateway endpoints and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL under which the `legal-analysis` and `text-to-speech`
    /// functions are reachable.
    pub base_url: String,
    /// Bearer credential for both gateways. Usually supplied through the
    /// `MUSTASHAR_API_KEY` environment variable instead.
    pub api_key: String,
    /// Per-request timeout enforced by the HTTP transport, in seconds.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321/functions/v1".to_string(),
            api_key: String::new(),
            timeout_secs: 60,
        }
    }
}
