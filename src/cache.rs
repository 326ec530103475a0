//! Cached lookup artifacts
//!
//! Layout under the archive root:
//!
//! ```text
//! AI_Answers/<key>.md
//! Wikipedia/<topic key>/top 5.txt
//! Wikipedia/<topic key>/<title key>.md
//! ```
//!
//! A non-empty file is a hit. Entries never expire.

use crate::error::JarvisResult;
use crate::sanitize::cache_key;
use std::path::{Path, PathBuf};
use tracing::debug;

const AI_DIR: &str = "AI_Answers";
const WIKI_DIR: &str = "Wikipedia";
const TITLES_INDEX: &str = "top 5.txt";

#[derive(Debug, Clone)]
pub struct ArchiveCache {
    root: PathBuf,
}

impl ArchiveCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ai_answer_path(&self, prompt: &str) -> PathBuf {
        self.root
            .join(AI_DIR)
            .join(format!("{}.md", cache_key(prompt)))
    }

    pub fn topic_dir(&self, topic: &str) -> PathBuf {
        self.root.join(WIKI_DIR).join(cache_key(topic))
    }

    pub fn summary_path(&self, topic: &str, title: &str) -> PathBuf {
        self.topic_dir(topic)
            .join(format!("{}.md", cache_key(title)))
    }

    pub fn ai_answer(&self, prompt: &str) -> Option<String> {
        read_hit(&self.ai_answer_path(prompt))
    }

    pub fn store_ai_answer(&self, prompt: &str, reply: &str) -> JarvisResult<PathBuf> {
        let path = self.ai_answer_path(prompt);
        write_artifact(&path, reply)?;
        Ok(path)
    }

    /// Titles previously found for `topic`
    pub fn topic_titles(&self, topic: &str) -> Option<Vec<String>> {
        let content = read_hit(&self.topic_dir(topic).join(TITLES_INDEX))?;
        let titles: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        (!titles.is_empty()).then_some(titles)
    }

    pub fn store_topic_titles(&self, topic: &str, titles: &[String]) -> JarvisResult<()> {
        write_artifact(&self.topic_dir(topic).join(TITLES_INDEX), &titles.join("\n"))
    }

    pub fn summary(&self, topic: &str, title: &str) -> Option<String> {
        read_hit(&self.summary_path(topic, title))
    }

    pub fn store_summary(&self, topic: &str, title: &str, summary: &str) -> JarvisResult<()> {
        write_artifact(&self.summary_path(topic, title), summary)
    }
}

fn read_hit(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    if content.is_empty() {
        return None;
    }
    debug!("📦 Cache hit: {}", path.display());
    Some(content)
}

fn write_artifact(path: &Path, content: &str) -> JarvisResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    debug!("📦 Cached: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> (tempfile::TempDir, ArchiveCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArchiveCache::new(dir.path().join("archive"));
        (dir, cache)
    }

    #[test]
    fn test_ai_answer_roundtrip() {
        let (_dir, cache) = cache();
        assert!(cache.ai_answer("what is rust").is_none());

        let path = cache.store_ai_answer("what is rust", "A language.").unwrap();
        assert!(path.ends_with("AI_Answers/what is rust.md"));
        assert_eq!(cache.ai_answer("what is rust").as_deref(), Some("A language."));
    }

    #[test]
    fn test_empty_file_is_a_miss() {
        let (_dir, cache) = cache();
        cache.store_ai_answer("blank", "").unwrap();
        assert!(cache.ai_answer("blank").is_none());
    }

    #[test]
    fn test_unsafe_prompt_stays_inside_archive() {
        let (_dir, cache) = cache();
        let path = cache.store_ai_answer("../../etc/passwd?", "nope").unwrap();
        assert!(path.starts_with(cache.root().join("AI_Answers")));
        assert_eq!(path.parent().unwrap(), cache.root().join("AI_Answers"));
    }

    #[test]
    fn test_colliding_prompts_do_not_overwrite() {
        let (_dir, cache) = cache();
        cache.store_ai_answer("a/b", "first").unwrap();
        cache.store_ai_answer("a:b", "second").unwrap();
        assert_eq!(cache.ai_answer("a/b").as_deref(), Some("first"));
        assert_eq!(cache.ai_answer("a:b").as_deref(), Some("second"));
    }

    #[test]
    fn test_topic_titles_and_summaries() {
        let (_dir, cache) = cache();
        assert!(cache.topic_titles("golang").is_none());

        let titles = vec!["Go (programming language)".to_string(), "Gopher".to_string()];
        cache.store_topic_titles("golang", &titles).unwrap();
        assert_eq!(cache.topic_titles("golang"), Some(titles));
        assert!(cache.topic_dir("golang").join("top 5.txt").exists());

        cache
            .store_summary("golang", "Gopher", "A burrowing rodent.")
            .unwrap();
        assert_eq!(
            cache.summary("golang", "Gopher").as_deref(),
            Some("A burrowing rodent.")
        );
        assert!(cache.summary("golang", "Go (programming language)").is_none());
    }
}
