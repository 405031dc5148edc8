//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Credentials are read once at startup and handed to
//! the components that need them.

use std::env;

/// Default chat-completions model served through OpenRouter
pub const DEFAULT_LLM_MODEL: &str = "google/gemini-2.0-flash-001";

/// Default OpenAI-compatible endpoint
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default GitHub REST API base
pub const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Default OpenWeatherMap API base
pub const DEFAULT_WEATHER_BASE_URL: &str = "http://api.openweathermap.org";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Language-model backend configuration
    pub llm: LlmConfig,
    /// Remote data providers used by the tools
    pub tools: ToolsConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Language-model backend configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// API key for the backend (`GEMINI_API_KEY`)
    pub api_key: Option<String>,
    /// Model name sent with every completion request
    pub model: String,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
}

/// Tool provider configuration
#[derive(Clone)]
pub struct ToolsConfig {
    /// Optional GitHub token; requests are unauthenticated without it
    pub github_token: Option<String>,
    /// GitHub REST API base URL
    pub github_api_base_url: String,
    /// OpenWeatherMap API key
    pub weather_api_key: Option<String>,
    /// OpenWeatherMap base URL
    pub weather_base_url: String,
}

// Credentials stay out of debug logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for ToolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsConfig")
            .field(
                "github_token",
                &self.github_token.as_ref().map(|_| "<redacted>"),
            )
            .field("github_api_base_url", &self.github_api_base_url)
            .field(
                "weather_api_key",
                &self.weather_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("weather_base_url", &self.weather_base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            llm: LlmConfig {
                api_key: non_empty_var("GEMINI_API_KEY"),
                model: non_empty_var("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                base_url: non_empty_var("LLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            },
            tools: ToolsConfig {
                github_token: non_empty_var("GITHUB_TOKEN"),
                github_api_base_url: non_empty_var("GITHUB_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE_URL.to_string()),
                weather_api_key: non_empty_var("OPENWEATHERMAP_API_KEY"),
                weather_base_url: non_empty_var("OPENWEATHERMAP_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Read an environment variable, treating empty values as unset
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
