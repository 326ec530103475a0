//! Knowledge lookup and repository search
//!
//! Two remote read-only services: an encyclopedia (titles + summaries) and a
//! code-hosting search API.

use crate::cache::ArchiveCache;
use crate::error::JarvisResult;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

pub mod github;
pub mod wikipedia;

pub use github::GithubSearch;
pub use wikipedia::WikipediaClient;

/// Encyclopedia-style knowledge source
#[async_trait]
pub trait KnowledgeBase: Send + Sync + std::fmt::Debug {
    /// Up to `limit` article titles related to `topic`
    async fn search(&self, topic: &str, limit: usize) -> JarvisResult<Vec<String>>;

    /// Summary text of the article named `title`
    async fn summary(&self, title: &str) -> JarvisResult<String>;
}

/// Code repository search
#[async_trait]
pub trait RepoSearch: Send + Sync + std::fmt::Debug {
    async fn search(&self, query: &str, limit: usize) -> JarvisResult<RepoSearchResults>;
}

/// One repository hit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RepoSearchResults {
    /// Matches reported by the service, not just the ones returned
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<Repository>,
}

impl RepoSearchResults {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A looked-up title and its summary, or the reason it couldn't be fetched
#[derive(Debug)]
pub struct Article {
    pub title: String,
    pub summary: JarvisResult<String>,
}

/// Titles for `topic`, each with its summary.
///
/// Titles and summaries come from the cache when present and are stored after a
/// fresh fetch. A failed summary only affects its own article.
pub async fn gather_articles(
    kb: &dyn KnowledgeBase,
    cache: &ArchiveCache,
    topic: &str,
    limit: usize,
) -> JarvisResult<Vec<Article>> {
    let titles = match cache.topic_titles(topic) {
        Some(titles) => titles,
        None => {
            let titles = kb.search(topic, limit).await?;
            if !titles.is_empty() {
                if let Err(e) = cache.store_topic_titles(topic, &titles) {
                    warn!("⚠️ Could not cache titles for '{}': {}", topic, e);
                }
            }
            titles
        }
    };

    let mut articles = Vec::with_capacity(titles.len());
    for title in titles.into_iter().take(limit) {
        let summary = match cache.summary(topic, &title) {
            Some(summary) => Ok(summary),
            None => {
                let fetched = kb.summary(&title).await;
                if let Ok(summary) = &fetched {
                    if let Err(e) = cache.store_summary(topic, &title, summary) {
                        warn!("⚠️ Could not cache summary for '{}': {}", title, e);
                    }
                } else {
                    debug!("Summary for '{}' failed", title);
                }
                fetched
            }
        };
        articles.push(Article { title, summary });
    }

    Ok(articles)
}
