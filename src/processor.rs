//! Command Processor
//!
//! Executes one utterance: classifies it, runs the matching handler and reports the
//! outcome on the display and through speech. Network-bound handlers are queued on the
//! [`TaskPool`] and report back when they finish.
//!
//! Nothing in here returns an error. Adapter failures become an error line plus a spoken
//! apology.

use crate::ai::{ChatModel, OpenRouterClient};
use crate::cache::ArchiveCache;
use crate::commands::Intent;
use crate::config::Config;
use crate::desktop::{CloseOutcome, DesktopControl, SystemDesktop};
use crate::display::Display;
use crate::error::JarvisResult;
use crate::lookup::{self, GithubSearch, KnowledgeBase, RepoSearch, WikipediaClient};
use crate::markdown::Style;
use crate::memory::{self, MemoryStore, RECALL_MISS};
use crate::normalizer::TextNormalizer;
use crate::session::SessionLog;
use crate::state::SessionState;
use crate::tasks::TaskPool;
use crate::tts::Speaker;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scripted answer to "help me" / "i need you"
pub const HELP_LINES: &[&str] = &[
    "Hello, Welcome!",
    "I am Jarvis, a personal-digital assistant!",
    "I'm here to help you as much as I can.",
    "Currently, there are 3 options:",
    "1 - Searching on Wikipedia",
    "2 - Searching on GitHub",
    "3 - Talking to AI",
    "But, how to use them?",
    "Say 'Look for <Subject>' to search Wikipedia.",
    "Say 'Search GitHub for <Repository Name>' to look for repositories on GitHub.",
    "Say 'Ask <Prompt>' to use AI.",
];

pub const NOT_UNDERSTOOD: &str = "I did not understand that. Please try again.";

/// Where an utterance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Spoken,
    Typed,
}

/// Result of processing a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// Command was handled completely
    Handled,
    /// Work was queued on the task pool and will report later
    Background,
    /// User requested quit
    Quit,
}

/// The external collaborators a processor talks to
#[derive(Debug, Clone)]
pub struct Services {
    pub chat: Arc<dyn ChatModel>,
    pub knowledge: Arc<dyn KnowledgeBase>,
    pub repos: Arc<dyn RepoSearch>,
    pub desktop: Arc<dyn DesktopControl>,
}

impl Services {
    /// The real network and OS adapters
    pub fn from_config(config: &Config) -> JarvisResult<Self> {
        Ok(Self {
            chat: Arc::new(OpenRouterClient::new(config)?),
            knowledge: Arc::new(WikipediaClient::new(config)?),
            repos: Arc::new(GithubSearch::new(config)?),
            desktop: Arc::new(SystemDesktop::new(config.process_map.clone())),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Processor {
    services: Services,
    speaker: Arc<Speaker>,
    display: Display,
    state: Arc<SessionState>,
    tasks: Arc<TaskPool>,
    memory: MemoryStore,
    session: SessionLog,
    cache: ArchiveCache,
    normalizer: TextNormalizer,
    user_name: String,
    introduction: Vec<String>,
    results_limit: usize,
}

impl Processor {
    pub fn new(
        config: &Config,
        services: Services,
        speaker: Arc<Speaker>,
        display: Display,
        state: Arc<SessionState>,
        tasks: Arc<TaskPool>,
    ) -> Self {
        Self {
            services,
            speaker,
            display,
            state,
            tasks,
            memory: MemoryStore::new(config.memory_path()),
            session: SessionLog::new(config.session_path()),
            cache: ArchiveCache::new(config.archive_path()),
            normalizer: TextNormalizer::new(config.voice_corrections.clone()),
            user_name: config.user_name.clone(),
            introduction: config.introduction(),
            results_limit: config.results_limit,
        }
    }

    pub fn tasks(&self) -> &Arc<TaskPool> {
        &self.tasks
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    pub fn cache(&self) -> &ArchiveCache {
        &self.cache
    }

    /// Handle one utterance
    pub async fn process(&self, utterance: &str, source: InputSource) -> ProcessResult {
        let text = match source {
            InputSource::Spoken => self.normalizer.normalize(utterance),
            InputSource::Typed => utterance.trim().to_string(),
        };
        if text.is_empty() {
            return ProcessResult::Handled;
        }

        let echo = match source {
            InputSource::Spoken => "You said",
            InputSource::Typed => "You typed",
        };
        self.display
            .markdown(&format!("*{}*: `{}`\n", echo, text), Style::Info);

        let intent = Intent::parse(&text);
        info!("🎯 '{}' -> {}", text, intent.name());

        match intent {
            Intent::Open(target) => self.open(&text, &target).await,
            Intent::Close(target) => self.close(&text, &target).await,
            Intent::Shutdown => self.shutdown(&text).await,
            Intent::Ask(prompt) => self.ask(text, prompt).await,
            Intent::LookFor(topic) => self.look_for(text, topic).await,
            Intent::SayMyName => {
                let reply = format!("You are {}, my great Boss!", self.user_name);
                self.reply(&text, &reply).await
            }
            Intent::WhatTime => {
                let reply = format!("It's {}", chrono::Local::now().format("%H:%M"));
                self.reply(&text, &reply).await
            }
            Intent::WhoAreYou => {
                let reply = self.introduction.last().cloned().unwrap_or_default();
                self.reply(&text, &reply).await
            }
            Intent::Goodbye => {
                self.reply(&text, "Goodbye Boss!").await;
                ProcessResult::Quit
            }
            Intent::SearchGithub(query) => self.search_github(text, query).await,
            Intent::Help => self.help(&text).await,
            Intent::Remember { key, value } => self.remember(&text, &key, &value).await,
            Intent::Recall(key) => self.recall(&text, &key).await,
            Intent::Forget(key) => self.forget(&text, &key).await,
            Intent::NotUnderstood => self.reply(&text, NOT_UNDERSTOOD).await,
        }
    }

    /// Speak `reply` and record the exchange
    async fn reply(&self, user: &str, reply: &str) -> ProcessResult {
        self.speaker.say(reply).await;
        self.record(user, reply);
        ProcessResult::Handled
    }

    /// Show an error line, apologise out loud and record the exchange
    async fn fail(&self, user: &str, detail: String, apology: &str) {
        warn!("❌ {}", detail);
        self.display.error(detail);
        self.speaker.say(apology).await;
        self.record(user, apology);
    }

    fn record(&self, user: &str, reply: &str) {
        if let Err(e) = self.session.log_interaction(user, reply) {
            warn!("⚠️ Could not write session log: {}", e);
        }
    }

    fn idle(&self) {
        self.display.status(self.state.idle_status());
    }

    async fn open(&self, user: &str, target: &str) -> ProcessResult {
        if target.is_empty() {
            return self.reply(user, "What should I open?").await;
        }

        self.speaker.say(&format!("Opening **{}**", target)).await;
        match self.services.desktop.open(target).await {
            Ok(()) => self.record(user, &format!("Opening {}", target)),
            Err(e) => {
                self.fail(
                    user,
                    format!("Open failed: {} ({})", target, e),
                    &format!("Sorry, I couldn't open `{}`", target),
                )
                .await
            }
        }
        ProcessResult::Handled
    }

    async fn close(&self, user: &str, target: &str) -> ProcessResult {
        if target.is_empty() {
            return self.reply(user, "What should I close?").await;
        }

        self.speaker.say(&format!("Closing **{}**", target)).await;
        match self.services.desktop.close(target).await {
            Ok(CloseOutcome::Closed(count)) => {
                debug!("Closed {} process(es) for {}", count, target);
                self.record(user, &format!("Closing {}", target));
            }
            Ok(CloseOutcome::NotRunning) => {
                self.display.info(format!("Not running: {}", target));
                self.reply(user, &format!("*{}* doesn't seem to be running.", target))
                    .await;
            }
            Ok(CloseOutcome::Unmapped) => {
                self.display.info(format!("No mapping for: {}", target));
                self.reply(user, &format!("I don't know how to close *{}*", target))
                    .await;
            }
            Err(e) => {
                self.fail(
                    user,
                    format!("Close failed: {} ({})", target, e),
                    &format!("Sorry, I couldn't close `{}`", target),
                )
                .await
            }
        }
        ProcessResult::Handled
    }

    async fn shutdown(&self, user: &str) -> ProcessResult {
        self.speaker.say("Shutting down the system.").await;
        match self.services.desktop.shutdown().await {
            Ok(()) => self.record(user, "Shutting down the system."),
            Err(e) => {
                self.fail(
                    user,
                    format!("Shutdown failed: {}", e),
                    "Sorry, I couldn't shut the system down.",
                )
                .await
            }
        }
        ProcessResult::Handled
    }

    async fn ask(&self, user: String, prompt: String) -> ProcessResult {
        if prompt.is_empty() {
            return self.reply(&user, "What should I ask?").await;
        }

        self.display
            .markdown(&format!("*Asking AI*: `{}`\n", prompt), Style::Info);

        let this = self.clone();
        self.tasks.spawn("ask", async move {
            this.display.status("Asking AI...");
            this.answer(&user, &prompt).await;
            this.idle();
        });
        ProcessResult::Background
    }

    async fn answer(&self, user: &str, prompt: &str) {
        let reply = match self.cache.ai_answer(prompt) {
            Some(cached) => cached,
            None => match self.services.chat.complete(prompt).await {
                Ok(reply) => {
                    if let Err(e) = self.cache.store_ai_answer(prompt, &reply) {
                        warn!("⚠️ Could not cache AI answer: {}", e);
                        self.display.error(format!("Could not save answer: {}", e));
                    }
                    reply
                }
                Err(e) => {
                    self.fail(
                        user,
                        format!("AI Error: {}", e),
                        "There was an error talking to the model.",
                    )
                    .await;
                    return;
                }
            },
        };

        self.display.markdown(
            &format!("\n## AI Answer: **{}**\n", prompt),
            Style::SectionTitle,
        );
        self.display.markdown(&format!("{}\n", reply), Style::Normal);
        self.speaker.say(&reply).await;
        self.record(user, &reply);
    }

    async fn look_for(&self, user: String, topic: String) -> ProcessResult {
        if topic.is_empty() {
            return self.reply(&user, "Please say a topic.").await;
        }

        self.display
            .markdown(&format!("*Looking up*: **{}**\n", topic), Style::Info);
        self.speaker.say(&format!("Looking for {}", topic)).await;

        let this = self.clone();
        self.tasks.spawn("look_for", async move {
            this.display.status("Searching Wikipedia...");
            this.show_articles(&user, &topic).await;
            this.idle();
        });
        ProcessResult::Background
    }

    async fn show_articles(&self, user: &str, topic: &str) {
        self.display.markdown(
            &format!("\n## Searching on Wikipedia: **{}**\n", topic),
            Style::SectionTitle,
        );

        let articles = match lookup::gather_articles(
            self.services.knowledge.as_ref(),
            &self.cache,
            topic,
            self.results_limit,
        )
        .await
        {
            Ok(articles) => articles,
            Err(e) => {
                self.fail(
                    user,
                    format!("Wikipedia Error: {}", e),
                    "There was an error while searching Wikipedia.",
                )
                .await;
                return;
            }
        };

        if articles.is_empty() {
            self.display.markdown("*No articles found.*\n", Style::Info);
            self.reply(user, &format!("I couldn't find anything about {}.", topic))
                .await;
            return;
        }

        for article in &articles {
            self.display
                .markdown(&format!("\n### {}\n", article.title), Style::ArticleTitle);
            match &article.summary {
                Ok(summary) => self.display.markdown(&format!("{}\n", summary), Style::Normal),
                Err(e) => self.display.markdown(&format!("*Error*: {}\n", e), Style::Normal),
            }
        }

        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        self.record(user, &format!("Wikipedia: {}", titles.join(", ")));
    }

    async fn search_github(&self, user: String, query: String) -> ProcessResult {
        if query.is_empty() {
            return self
                .reply(&user, "Please say a topic to search on GitHub.")
                .await;
        }

        self.display
            .markdown(&format!("*Searching GitHub for*: **{}**\n", query), Style::Info);
        self.speaker
            .say(&format!("Searching GitHub for {}", query))
            .await;

        let this = self.clone();
        self.tasks.spawn("search_github", async move {
            this.display.status("Searching GitHub...");
            this.show_repositories(&user, &query).await;
            this.idle();
        });
        ProcessResult::Background
    }

    async fn show_repositories(&self, user: &str, query: &str) {
        self.display.markdown(
            &format!("\n## Searching GitHub: **{}**\n", query),
            Style::SectionTitle,
        );

        let results = match self.services.repos.search(query, self.results_limit).await {
            Ok(results) => results,
            Err(e) => {
                self.fail(
                    user,
                    format!("GitHub API Error: {}", e),
                    "There was an error while trying to connect to GitHub.",
                )
                .await;
                return;
            }
        };

        if results.is_empty() {
            self.display
                .markdown("*No repositories found.*\n", Style::Info);
            self.reply(user, "I couldn't find any repositories for that query.")
                .await;
            return;
        }

        for repo in &results.items {
            self.display
                .markdown(&format!("\n### {}\n", repo.full_name), Style::ArticleTitle);
            self.display
                .markdown(&format!("URL: {}\n", repo.html_url), Style::Normal);
            let description = repo
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("No description provided.");
            self.display
                .markdown(&format!("Description: {}\n", description), Style::Normal);
            self.display
                .log(format!("Stars: {}", repo.stargazers_count), Style::Info);
        }

        let reply = format!(
            "I found {} repositories for your query. Here are the top {} results.",
            results.total_count,
            results.items.len()
        );
        self.reply(user, &reply).await;
    }

    async fn help(&self, user: &str) -> ProcessResult {
        for line in HELP_LINES {
            self.display
                .markdown(&format!("**{}**\n", line), Style::Normal);
            self.speaker.say(line).await;
        }
        self.record(user, &HELP_LINES.join(" "));
        ProcessResult::Handled
    }

    async fn remember(&self, user: &str, key: &str, value: &str) -> ProcessResult {
        match self.memory.remember(key, value) {
            Ok(()) => {
                self.reply(user, &format!("Okay, I'll remember that {} is {}.", key, value))
                    .await
            }
            Err(e) => {
                self.fail(
                    user,
                    format!("Memory Error: {}", e),
                    "Sorry, I couldn't save that.",
                )
                .await;
                ProcessResult::Handled
            }
        }
    }

    async fn recall(&self, user: &str, key: &str) -> ProcessResult {
        match self.memory.recall(key) {
            Ok(serde_json::Value::String(s)) if s == RECALL_MISS => {
                self.reply(user, RECALL_MISS).await
            }
            Ok(serde_json::Value::String(s)) => {
                self.reply(user, &format!("{} is {}.", key, s)).await
            }
            Ok(value) => self.reply(user, &format!("{} is {}.", key, value)).await,
            Err(e) => {
                self.fail(
                    user,
                    format!("Memory Error: {}", e),
                    "Sorry, I couldn't read my memory.",
                )
                .await;
                ProcessResult::Handled
            }
        }
    }

    async fn forget(&self, user: &str, key: &str) -> ProcessResult {
        match self.memory.forget(key) {
            Ok(existed) => self.reply(user, &memory::forget_reply(key, existed)).await,
            Err(e) => {
                self.fail(
                    user,
                    format!("Memory Error: {}", e),
                    "Sorry, I couldn't update my memory.",
                )
                .await;
                ProcessResult::Handled
            }
        }
    }
}
