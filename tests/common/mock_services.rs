//! Recording stand-ins for the network and desktop adapters

use async_trait::async_trait;
use jarvis::ai::ChatModel;
use jarvis::desktop::{CloseOutcome, DesktopControl};
use jarvis::lookup::{KnowledgeBase, RepoSearch, RepoSearchResults, Repository};
use jarvis::{JarvisError, JarvisResult};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockChat {
    pub prompts: Mutex<Vec<String>>,
    pub fail: Mutex<bool>,
}

impl MockChat {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChat {
    async fn complete(&self, prompt: &str) -> JarvisResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if *self.fail.lock().unwrap() {
            return Err(JarvisError::service("OpenRouter", "HTTP 500"));
        }
        Ok(format!("Answer about {}", prompt))
    }

    fn name(&self) -> &str {
        "mock-model"
    }
}

#[derive(Debug, Default)]
pub struct MockKnowledge {
    pub titles: Vec<String>,
    /// Titles whose summary fetch fails
    pub broken: HashSet<String>,
    pub topics: Mutex<Vec<String>>,
}

impl MockKnowledge {
    pub fn new(titles: &[&str], broken: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(|t| t.to_string()).collect(),
            broken: broken.iter().map(|t| t.to_string()).collect(),
            topics: Mutex::new(Vec::new()),
        }
    }

    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeBase for MockKnowledge {
    async fn search(&self, topic: &str, limit: usize) -> JarvisResult<Vec<String>> {
        self.topics.lock().unwrap().push(topic.to_string());
        Ok(self.titles.iter().take(limit).cloned().collect())
    }

    async fn summary(&self, title: &str) -> JarvisResult<String> {
        if self.broken.contains(title) {
            return Err(JarvisError::service(
                "Wikipedia",
                format!("page \"{}\" does not exist", title),
            ));
        }
        Ok(format!("Summary of {}.", title))
    }
}

#[derive(Debug, Default)]
pub struct MockRepos {
    pub total_count: u64,
    pub names: Vec<String>,
    pub queries: Mutex<Vec<String>>,
}

impl MockRepos {
    pub fn new(total_count: u64, names: &[&str]) -> Self {
        Self {
            total_count,
            names: names.iter().map(|n| n.to_string()).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepoSearch for MockRepos {
    async fn search(&self, query: &str, limit: usize) -> JarvisResult<RepoSearchResults> {
        self.queries.lock().unwrap().push(query.to_string());
        let items = self
            .names
            .iter()
            .take(limit)
            .map(|name| Repository {
                full_name: name.clone(),
                html_url: format!("https://github.com/{}", name),
                description: None,
                stargazers_count: 7,
            })
            .collect();
        Ok(RepoSearchResults {
            total_count: self.total_count,
            items,
        })
    }
}

#[derive(Debug)]
pub struct MockDesktop {
    pub opened: Mutex<Vec<String>>,
    pub closed: Mutex<Vec<String>>,
    pub close_outcome: CloseOutcome,
    pub shutdowns: Mutex<usize>,
}

impl Default for MockDesktop {
    fn default() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
            close_outcome: CloseOutcome::Closed(1),
            shutdowns: Mutex::new(0),
        }
    }
}

impl MockDesktop {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DesktopControl for MockDesktop {
    async fn open(&self, target: &str) -> JarvisResult<()> {
        self.opened.lock().unwrap().push(target.to_string());
        Ok(())
    }

    async fn close(&self, target: &str) -> JarvisResult<CloseOutcome> {
        self.closed.lock().unwrap().push(target.to_string());
        Ok(self.close_outcome)
    }

    async fn shutdown(&self) -> JarvisResult<()> {
        *self.shutdowns.lock().unwrap() += 1;
        Ok(())
    }
}
