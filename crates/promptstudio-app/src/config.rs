use std::path::PathBuf;
use std::time::Duration;

use promptstudio_gateway::{GatewayConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use promptstudio_tools::ToolsConfig;

/// Application settings, read once at startup and passed down immutably
#[derive(Debug, Clone)]
pub struct Settings {
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub openrouter_timeout: Duration,
    pub http_referer: Option<String>,
    pub x_title: Option<String>,
    pub brave_api_key: Option<String>,
    pub jina_api_key: Option<String>,
    pub data_dir: PathBuf,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> Self {
        let timeout_secs = env_opt("OPENROUTER_TIMEOUT")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            openrouter_api_key: env_opt("OPENROUTER_API_KEY").unwrap_or_default(),
            openrouter_base_url: env_opt("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openrouter_timeout: Duration::from_secs(timeout_secs),
            http_referer: env_opt("OPENROUTER_HTTP_REFERER"),
            x_title: env_opt("OPENROUTER_X_TITLE"),
            brave_api_key: env_opt("BRAVE_API_KEY"),
            jina_api_key: env_opt("JINA_API_KEY"),
            data_dir: env_opt("PROMPTSTUDIO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.openrouter_api_key.is_empty()
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.openrouter_base_url.clone(),
            api_key: self.openrouter_api_key.clone(),
            timeout: self.openrouter_timeout,
            http_referer: self.http_referer.clone(),
            x_title: self.x_title.clone(),
            request_id: None,
        }
    }

    pub fn tools_config(&self) -> ToolsConfig {
        ToolsConfig {
            brave_api_key: self.brave_api_key.clone(),
            jina_api_key: self.jina_api_key.clone(),
        }
    }
}
