use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    agent::{payload::Payload, types::StepOutcome},
    error::Result,
    tools::{
        http::{build_client, fetch_json, field},
        registry::{CapabilityResult, Connector, ToolBuilder},
    },
};

pub const GITHUB_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchRepositoriesParams {
    pub query: String,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryParams {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserReposParams {
    pub username: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_sort() -> String {
    "stars".to_string()
}

fn default_limit() -> u32 {
    5
}

/// GitHub REST connector for repository search and lookup.
pub struct GithubConnector {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GithubConnector {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: GITHUB_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, path: &str) -> RequestBuilder {
        debug!("GET {}{}", self.base_url, path);
        let request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/vnd.github.v3+json");
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("token {key}")),
            None => request,
        }
    }

    pub async fn search_repositories(&self, params: SearchRepositoriesParams) -> CapabilityResult {
        let request = self.request("/search/repositories").query(&[
            ("q", params.query),
            ("sort", params.sort),
            ("order", "desc".to_string()),
            ("per_page", params.limit.to_string()),
        ]);

        Ok(match fetch_json(request).await {
            Ok(data) => {
                let repos = items(data.get("items"))
                    .map(|item| repository_summary(item, false))
                    .collect();
                StepOutcome::Success(Payload::Unstructured(Value::Array(repos)))
            }
            Err(e) => request_failed(e),
        })
    }

    pub async fn get_repository(&self, params: RepositoryParams) -> CapabilityResult {
        let request = self.request(&format!("/repos/{}/{}", params.owner, params.repo));

        Ok(match fetch_json(request).await {
            Ok(data) => StepOutcome::Success(Payload::Unstructured(repository_detail(&data))),
            Err(e) => request_failed(e),
        })
    }

    pub async fn get_user_repos(&self, params: UserReposParams) -> CapabilityResult {
        let request = self
            .request(&format!("/users/{}/repos", params.username))
            .query(&[
                ("sort", "updated".to_string()),
                ("per_page", params.limit.to_string()),
            ]);

        Ok(match fetch_json(request).await {
            Ok(data) => {
                let repos = items(Some(&data))
                    .map(|item| repository_summary(item, true))
                    .collect();
                StepOutcome::Success(Payload::Unstructured(Value::Array(repos)))
            }
            Err(e) => request_failed(e),
        })
    }
}

impl Connector for GithubConnector {
    fn into_tool(self: Arc<Self>) -> ToolBuilder {
        let search = self.clone();
        let repo = self.clone();
        let user = self;
        ToolBuilder::new(
            "github",
            "Search GitHub repositories and get repository information",
        )
        .capability("search_repositories", move |p: SearchRepositoriesParams| {
            let c = search.clone();
            async move { c.search_repositories(p).await }
        })
        .capability("get_repository", move |p: RepositoryParams| {
            let c = repo.clone();
            async move { c.get_repository(p).await }
        })
        .capability("get_user_repos", move |p: UserReposParams| {
            let c = user.clone();
            async move { c.get_user_repos(p).await }
        })
    }
}

fn request_failed(e: reqwest::Error) -> StepOutcome {
    warn!("GitHub API request failed: {}", e);
    StepOutcome::failure(format!("GitHub API request failed: {e}"))
}

fn items(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|a| a.iter())
        .into_iter()
        .flatten()
}

/// Compact repository view; user listings omit topics.
pub fn repository_summary(item: &Value, user_listing: bool) -> Value {
    let mut summary = json!({
        "name": field(item, "/name"),
        "full_name": field(item, "/full_name"),
        "description": field(item, "/description"),
        "stars": field(item, "/stargazers_count"),
        "forks": field(item, "/forks_count"),
        "language": field(item, "/language"),
        "url": field(item, "/html_url"),
    });
    if !user_listing {
        summary["topics"] = item.get("topics").cloned().unwrap_or_else(|| json!([]));
    }
    summary
}

pub fn repository_detail(data: &Value) -> Value {
    json!({
        "name": field(data, "/name"),
        "full_name": field(data, "/full_name"),
        "description": field(data, "/description"),
        "stars": field(data, "/stargazers_count"),
        "forks": field(data, "/forks_count"),
        "watchers": field(data, "/watchers_count"),
        "language": field(data, "/language"),
        "url": field(data, "/html_url"),
        "created_at": field(data, "/created_at"),
        "updated_at": field(data, "/updated_at"),
        "open_issues": field(data, "/open_issues_count"),
        "topics": data.get("topics").cloned().unwrap_or_else(|| json!([])),
    })
}
