//! GitHub tools: repository search, repository details, user repositories

use crate::tools::{describe_reqwest_error, ToolEnvelope, ToolError};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const TOPICS_PREVIEW: &str = "application/vnd.github.mercy-preview+json";
const V3_JSON: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = concat!("assistops/", env!("CARGO_PKG_VERSION"));

/// Repository entry in search and listing results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// `owner/name`
    pub name: Option<String>,
    /// Repository description
    pub description: Option<String>,
    /// Stargazer count
    pub stars: Option<u64>,
    /// Web URL
    pub url: Option<String>,
    /// Whether the repository is a fork
    pub is_fork: Option<bool>,
    /// Repository topics
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Result of `search_repositories` and `list_user_repositories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryList {
    /// Matching repositories, in provider order
    pub repositories: Vec<RepositorySummary>,
}

/// Result of `get_repo_details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDetails {
    /// `owner/name`
    pub name: String,
    /// Repository description
    pub description: Option<String>,
    /// Stargazer count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// Whether the repository is a fork
    pub is_fork: bool,
    /// Repository topics
    #[serde(default)]
    pub topics: Vec<String>,
    /// Upstream repository, for forks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ForkParent>,
}

/// Upstream of a forked repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkParent {
    /// `owner/name` of the upstream
    pub full_name: Option<String>,
    /// Upstream owner login
    pub owner: Option<String>,
    /// Upstream web URL
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct GhRepo {
    full_name: Option<String>,
    description: Option<String>,
    stargazers_count: Option<u64>,
    html_url: Option<String>,
    fork: Option<bool>,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Deserialize)]
struct GhSearchResponse {
    #[serde(default)]
    items: Vec<GhRepo>,
}

#[derive(Deserialize)]
struct GhRepoDetail {
    full_name: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    topics: Vec<String>,
    parent: Option<GhParent>,
}

#[derive(Deserialize)]
struct GhParent {
    full_name: Option<String>,
    owner: Option<GhOwner>,
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct GhOwner {
    login: Option<String>,
}

impl From<GhRepo> for RepositorySummary {
    fn from(repo: GhRepo) -> Self {
        Self {
            name: repo.full_name,
            description: repo.description,
            stars: repo.stargazers_count,
            url: repo.html_url,
            is_fork: repo.fork,
            topics: repo.topics,
        }
    }
}

impl From<GhRepoDetail> for RepositoryDetails {
    fn from(data: GhRepoDetail) -> Self {
        let parent = if data.fork {
            data.parent.map(|p| ForkParent {
                full_name: p.full_name,
                owner: p.owner.and_then(|o| o.login),
                url: p.html_url,
            })
        } else {
            None
        };

        Self {
            name: data.full_name,
            description: data.description,
            stars: data.stargazers_count,
            forks: data.forks_count,
            is_fork: data.fork,
            topics: data.topics,
            parent,
        }
    }
}

/// GitHub REST client; works unauthenticated (rate-limited) without a token
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("authenticated", &self.token.is_some())
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GithubClient {
    /// Create a client
    pub fn new(http: reqwest::Client, token: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `search_repositories(query, limit)`
    pub async fn search_repositories(&self, query: &str, limit: u32) -> ToolEnvelope {
        const CONTEXT: &str = "GitHub search failed";

        let per_page = limit.to_string();
        let result = self
            .get_json::<GhSearchResponse>(
                &["search", "repositories"],
                &[("q", query), ("per_page", per_page.as_str())],
                TOPICS_PREVIEW,
                CONTEXT,
            )
            .await
            .map(|body| RepositoryList {
                repositories: body.items.into_iter().map(Into::into).collect(),
            });

        result.into()
    }

    /// `get_repo_details(owner, repo)`
    pub async fn get_repo_details(&self, owner: &str, repo: &str) -> ToolEnvelope {
        const CONTEXT: &str = "Failed to fetch repo details";

        self.get_json::<GhRepoDetail>(&["repos", owner, repo], &[], V3_JSON, CONTEXT)
            .await
            .map(RepositoryDetails::from)
            .into()
    }

    /// `list_user_repositories(username, limit)`, most recently updated first
    pub async fn list_user_repositories(&self, username: &str, limit: u32) -> ToolEnvelope {
        const CONTEXT: &str = "Failed to list user repositories";

        let per_page = limit.to_string();
        self.get_json::<Vec<GhRepo>>(
            &["users", username, "repos"],
            &[("per_page", per_page.as_str()), ("sort", "updated")],
            TOPICS_PREVIEW,
            CONTEXT,
        )
        .await
        .map(|items| RepositoryList {
            repositories: items.into_iter().map(Into::into).collect(),
        })
        .into()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        accept: &str,
        context: &'static str,
    ) -> Result<T, ToolError> {
        // Segments are percent-encoded individually
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ToolError::request(context, format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ToolError::request(context, "invalid base URL: cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        tracing::debug!(
            url = %url,
            authenticated = self.token.is_some(),
            "Calling GitHub API"
        );

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, accept)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ToolError::request(context, describe_reqwest_error(e)))?;

        response
            .json::<T>()
            .await
            .map_err(|e| ToolError::request(context, describe_reqwest_error(e)))
    }
}
