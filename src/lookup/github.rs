//! GitHub repository search

use super::{RepoSearch, RepoSearchResults};
use crate::config::Config;
use crate::error::{JarvisError, JarvisResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

const SERVICE: &str = "GitHub";

#[derive(Debug, Clone)]
pub struct GithubSearch {
    client: reqwest::Client,
    api_url: String,
}

impl GithubSearch {
    pub fn new(config: &Config) -> JarvisResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.search_timeout_secs))
            .user_agent(concat!("jarvis/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RepoSearch for GithubSearch {
    async fn search(&self, query: &str, limit: usize) -> JarvisResult<RepoSearchResults> {
        debug!("🐙 GitHub search: '{}'", query);
        let per_page = limit.to_string();
        let response = self
            .client
            .get(format!("{}/search/repositories", self.api_url))
            .query(&[("q", query), ("per_page", per_page.as_str())])
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("❌ GitHub API error ({}): {}", status, body);
            return Err(JarvisError::service(SERVICE, format!("HTTP {}", status)));
        }

        let mut results: RepoSearchResults = response
            .json()
            .await
            .map_err(|e| JarvisError::service(SERVICE, format!("malformed reply: {}", e)))?;
        results.items.truncate(limit);
        Ok(results)
    }
}
