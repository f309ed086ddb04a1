use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 4700;
const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_MODEL: &str = "gpt-4";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EMAIL_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_EMAIL_FROM: &str = "onboarding@resend.dev";
const DEFAULT_APP_URL: &str = "http://localhost:4700";
const DEFAULT_UPLOAD_MAX_BYTES: u64 = 10 * 1024 * 1024;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── ServerConfig ─────────────────────────────────────────────────────────────

/// HTTP server configuration (`[server]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: 127.0.0.1; use 0.0.0.0 to expose on the LAN).
    pub bind_address: String,
    /// Listen port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: DEFAULT_PORT,
        }
    }
}

// ─── AiConfig ─────────────────────────────────────────────────────────────────

/// AI completion backend configuration (`[ai]` in config.toml).
///
/// When `api_key` is absent the service runs without an AI backend:
/// recommendations come from the deterministic rule fallback and the chat
/// assistant answers with a fixed unavailability message.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key. Overridden by `OPENAI_API_KEY` when set. None = AI disabled.
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible chat-completions API.
    pub base_url: String,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Hard cap on a single completion call, in seconds.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

// ─── EmailConfig ──────────────────────────────────────────────────────────────

/// Transactional email configuration (`[email]` in config.toml).
///
/// Sends are fire-and-forget; a missing `api_key` turns the mailer into a
/// logged no-op.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    /// API key. Overridden by `RESEND_API_KEY` when set. None = mailer disabled.
    pub api_key: Option<String>,
    /// Base URL of the email HTTP API.
    pub base_url: String,
    /// From address for all outbound mail.
    pub from: String,
    /// Public base URL of the application, used in verification/reset links.
    pub app_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_EMAIL_BASE_URL.to_string(),
            from: DEFAULT_EMAIL_FROM.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
        }
    }
}

// ─── UploadsConfig ────────────────────────────────────────────────────────────

/// Document upload configuration (`[uploads]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Maximum accepted file size in bytes (default: 10 MB).
    pub max_bytes: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
        }
    }
}

// ─── ServiceConfig ────────────────────────────────────────────────────────────

/// Root service configuration, loaded from `<data_dir>/config.toml` with
/// env overlays for secrets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub email: EmailConfig,
    pub uploads: UploadsConfig,

    /// Data directory holding the SQLite database and uploads. Not read from
    /// the config file — always set from the CLI / environment.
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl ServiceConfig {
    /// Load configuration from `<data_dir>/config.toml` if present, falling
    /// back to defaults. Secrets are overlaid from the environment
    /// (`OPENAI_API_KEY`, `RESEND_API_KEY`) after the file is parsed.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("config.toml");
        let mut config = match std::fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str::<ServiceConfig>(&raw) {
                Ok(config) => {
                    info!("loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("config.toml is invalid ({e}), using defaults");
                    ServiceConfig::default()
                }
            },
            Err(_) => ServiceConfig::default(),
        };

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.ai.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("RESEND_API_KEY") {
            if !key.is_empty() {
                config.email.api_key = Some(key);
            }
        }

        config.data_dir = data_dir.to_path_buf();
        config
    }

    /// Directory where uploaded documents are stored.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}
