//! Tool adapters
//!
//! Every tool wraps one read-only remote query and reports its outcome as a
//! [`ToolEnvelope`]: `{"status": "success", ...fields}` or
//! `{"status": "failed", "error": "..."}`. Adapters never return errors past
//! this boundary.
//!
//! The catalog is closed: [`ToolCall`] has one variant per tool and
//! [`Toolbox::invoke`] matches on it exhaustively. Names coming back from the
//! model are resolved with [`ToolCall::from_parts`], which is where unknown
//! names are caught at runtime.

pub mod github;
pub mod weather;

pub use github::{ForkParent, GithubClient, RepositoryDetails, RepositoryList, RepositorySummary};
pub use weather::{WeatherClient, WeatherReport};

use crate::config::ToolsConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Names the planner may use, in catalog order
pub const TOOL_NAMES: [&str; 4] = [
    "get_weather",
    "search_repositories",
    "get_repo_details",
    "list_user_repositories",
];

/// Catalog lines shown to the planner
pub const TOOL_CATALOG: &str = "\
1. get_weather(city: str): Current weather for a city (temperature, conditions, humidity, wind).
2. search_repositories(query: str, limit: int = 5): Keyword search over public GitHub repositories.
3. get_repo_details(owner: str, repo: str): Detailed metrics for one repository (stars, forks, topics, fork parent).
4. list_user_repositories(username: str, limit: int = 10): A user's most recently updated repositories; best for describing someone's work and skills.";

/// One resolved tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "tool",
    content = "args",
    rename_all = "snake_case",
    deny_unknown_fields
)]
pub enum ToolCall {
    /// Current weather for a city
    GetWeather {
        /// City name as typed by the user
        city: String,
    },
    /// Repository keyword search
    SearchRepositories {
        /// GitHub search query
        query: String,
        /// Maximum number of results
        #[serde(default = "default_search_limit")]
        limit: u32,
    },
    /// Details for a single repository
    GetRepoDetails {
        /// Repository owner login
        owner: String,
        /// Repository name
        repo: String,
    },
    /// Repositories owned by a user
    ListUserRepositories {
        /// GitHub login
        username: String,
        /// Maximum number of results
        #[serde(default = "default_user_repo_limit")]
        limit: u32,
    },
}

fn default_search_limit() -> u32 {
    5
}

fn default_user_repo_limit() -> u32 {
    10
}

impl ToolCall {
    /// Resolve a tool name and its raw arguments into a call
    ///
    /// # Errors
    /// * `ToolError::UnknownTool` if `tool` is not in the catalog
    /// * `ToolError::InvalidArguments` if `args` is not an object, is missing a
    ///   parameter, has a value of the wrong type, or names a parameter the
    ///   tool does not take
    pub fn from_parts(tool: &str, args: &Value) -> Result<Self, ToolError> {
        if !TOOL_NAMES.contains(&tool) {
            return Err(ToolError::UnknownTool(tool.to_string()));
        }
        if !args.is_object() {
            return Err(ToolError::InvalidArguments {
                tool: tool.to_string(),
                reason: "arguments must be a JSON object".to_string(),
            });
        }

        let tagged = serde_json::json!({ "tool": tool, "args": args });
        serde_json::from_value(tagged).map_err(|e| ToolError::InvalidArguments {
            tool: tool.to_string(),
            reason: e.to_string(),
        })
    }

    /// Catalog name of this call's tool
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetWeather { .. } => "get_weather",
            ToolCall::SearchRepositories { .. } => "search_repositories",
            ToolCall::GetRepoDetails { .. } => "get_repo_details",
            ToolCall::ListUserRepositories { .. } => "list_user_repositories",
        }
    }
}

/// Domain payload of a successful tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// `get_weather`
    Weather(WeatherReport),
    /// `get_repo_details`
    RepositoryDetails(RepositoryDetails),
    /// `search_repositories` and `list_user_repositories`
    Repositories(RepositoryList),
}

/// Uniform success/failure envelope returned by every tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolEnvelope {
    /// The remote query succeeded; domain fields sit beside `status`
    Success(ToolOutput),
    /// The query failed
    Failed {
        /// Human-readable failure message
        error: String,
    },
}

impl ToolEnvelope {
    /// Whether the envelope reports a failure
    pub fn is_failed(&self) -> bool {
        matches!(self, ToolEnvelope::Failed { .. })
    }

    /// Failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            ToolEnvelope::Failed { error } => Some(error),
            ToolEnvelope::Success(_) => None,
        }
    }
}

impl<T: Into<ToolOutput>> From<Result<T, ToolError>> for ToolEnvelope {
    fn from(result: Result<T, ToolError>) -> Self {
        match result {
            Ok(output) => ToolEnvelope::Success(output.into()),
            Err(e) => ToolEnvelope::Failed {
                error: e.to_string(),
            },
        }
    }
}

impl From<WeatherReport> for ToolOutput {
    fn from(report: WeatherReport) -> Self {
        ToolOutput::Weather(report)
    }
}

impl From<RepositoryDetails> for ToolOutput {
    fn from(details: RepositoryDetails) -> Self {
        ToolOutput::RepositoryDetails(details)
    }
}

impl From<RepositoryList> for ToolOutput {
    fn from(list: RepositoryList) -> Self {
        ToolOutput::Repositories(list)
    }
}

/// Failures inside tool resolution and adapters
#[derive(Error, Debug)]
pub enum ToolError {
    /// The planner named a tool outside the catalog
    #[error("Tool '{0}' not found.")]
    UnknownTool(String),

    /// Arguments could not be decoded into the tool's parameters
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments {
        /// Tool name
        tool: String,
        /// Decoder message
        reason: String,
    },

    /// A credential the adapter cannot work without is absent
    #[error("{0} not set.")]
    MissingCredential(&'static str),

    /// The weather provider did not recognise the city
    #[error("City not found")]
    CityNotFound,

    /// Transport, status, or decoding failure, prefixed with the adapter's context
    #[error("{context}: {message}")]
    Request {
        /// Adapter-specific prefix, e.g. "GitHub search failed"
        context: &'static str,
        /// Underlying failure
        message: String,
    },
}

impl ToolError {
    /// Wrap a lower-level failure with an adapter prefix
    pub fn request(context: &'static str, message: impl std::fmt::Display) -> Self {
        ToolError::Request {
            context,
            message: message.to_string(),
        }
    }
}

/// Render a reqwest failure without the request URL, which may carry credentials
pub(crate) fn describe_reqwest_error(error: reqwest::Error) -> String {
    match error.status() {
        Some(status) => format!("HTTP {}", status),
        None => error.without_url().to_string(),
    }
}

/// All tool adapters, sharing one HTTP client
#[derive(Debug, Clone)]
pub struct Toolbox {
    weather: WeatherClient,
    github: GithubClient,
}

impl Toolbox {
    /// Create a toolbox from explicit clients
    pub fn new(weather: WeatherClient, github: GithubClient) -> Self {
        Self { weather, github }
    }

    /// Create a toolbox from application configuration
    pub fn from_config(http: reqwest::Client, config: &ToolsConfig) -> Self {
        Self {
            weather: WeatherClient::new(
                http.clone(),
                config.weather_api_key.clone(),
                config.weather_base_url.clone(),
            ),
            github: GithubClient::new(
                http,
                config.github_token.clone(),
                config.github_api_base_url.clone(),
            ),
        }
    }

    /// Run one tool call
    pub async fn invoke(&self, call: &ToolCall) -> ToolEnvelope {
        match call {
            ToolCall::GetWeather { city } => self.weather.get_weather(city).await,
            ToolCall::SearchRepositories { query, limit } => {
                self.github.search_repositories(query, *limit).await
            }
            ToolCall::GetRepoDetails { owner, repo } => {
                self.github.get_repo_details(owner, repo).await
            }
            ToolCall::ListUserRepositories { username, limit } => {
                self.github.list_user_repositories(username, *limit).await
            }
        }
    }
}
