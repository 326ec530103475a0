//! Wikipedia search and page summaries

use super::KnowledgeBase;
use crate::config::Config;
use crate::error::{JarvisError, JarvisResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "Wikipedia";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(config: &Config) -> JarvisResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .user_agent(concat!("jarvis/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.wikipedia_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Path segment for a page title: spaces become underscores, the rest is percent-encoded
fn title_segment(title: &str) -> String {
    urlencoding::encode(&title.replace(' ', "_")).into_owned()
}

#[async_trait]
impl KnowledgeBase for WikipediaClient {
    async fn search(&self, topic: &str, limit: usize) -> JarvisResult<Vec<String>> {
        debug!("📚 Wikipedia search: '{}'", topic);
        let limit = limit.to_string();
        let response = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", topic),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JarvisError::service(SERVICE, format!("HTTP {}", status)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| JarvisError::service(SERVICE, format!("malformed search reply: {}", e)))?;

        Ok(body
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn summary(&self, title: &str) -> JarvisResult<String> {
        debug!("📚 Wikipedia summary: '{}'", title);
        let response = self
            .client
            .get(format!(
                "{}/api/rest_v1/page/summary/{}",
                self.base_url,
                title_segment(title)
            ))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(JarvisError::service(
                SERVICE,
                format!("page \"{}\" does not exist", title),
            ));
        }
        if !status.is_success() {
            return Err(JarvisError::service(SERVICE, format!("HTTP {}", status)));
        }

        let page: PageSummary = response
            .json()
            .await
            .map_err(|e| JarvisError::service(SERVICE, format!("malformed summary: {}", e)))?;

        if page.extract.trim().is_empty() {
            return Err(JarvisError::service(
                SERVICE,
                format!("page \"{}\" has no summary", title),
            ));
        }
        Ok(page.extract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_segment() {
        assert_eq!(
            title_segment("Go (programming language)"),
            "Go_%28programming_language%29"
        );
        assert_eq!(title_segment("C++"), "C%2B%2B");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = Config {
            wikipedia_url: "https://en.wikipedia.org/".into(),
            ..Config::default()
        };
        let client = WikipediaClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://en.wikipedia.org");
    }
}
