//! Command matching module
//!
//! Maps one utterance to an [`Intent`]. Matching is purely lexical: ASCII
//! case-insensitive prefix, literal and substring tests, tried in a fixed order.
//! Arguments keep the casing the user typed.

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `open <target>`
    Open(String),
    /// `close <target>`
    Close(String),
    /// literal `shutdown`
    Shutdown,
    /// `ask <prompt>`
    Ask(String),
    /// `look for <topic>`
    LookFor(String),
    SayMyName,
    WhatTime,
    WhoAreYou,
    /// literal `goodbye` or `exit`; ends the process
    Goodbye,
    /// `search github for <query>`
    SearchGithub(String),
    /// contains `help me` or `i need you`
    Help,
    /// `remember <key> is <value>`
    Remember { key: String, value: String },
    /// `recall <key>`
    Recall(String),
    /// `forget <key>`
    Forget(String),
    /// Nothing matched
    NotUnderstood,
}

impl Intent {
    /// Classify an utterance. Never fails; unmatched input is [`Intent::NotUnderstood`].
    pub fn parse(utterance: &str) -> Self {
        // A bare keyword ("ask", "look for") is that command with an empty argument
        let text = utterance.trim_start();
        let literal = text.trim_end().to_lowercase();

        // 1. Desktop commands
        if literal == "open" {
            return Intent::Open(String::new());
        }
        if let Some(target) = strip_prefix_ci(text, "open ") {
            return Intent::Open(target.trim().to_string());
        }
        if literal == "close" {
            return Intent::Close(String::new());
        }
        if let Some(target) = strip_prefix_ci(text, "close ") {
            return Intent::Close(target.trim().to_string());
        }
        if literal == "shutdown" {
            return Intent::Shutdown;
        }

        // 2. AI
        if literal == "ask" {
            return Intent::Ask(String::new());
        }
        if let Some(prompt) = strip_prefix_ci(text, "ask ") {
            return Intent::Ask(prompt.trim().to_string());
        }

        // 3. Knowledge lookup
        if literal == "look for" {
            return Intent::LookFor(String::new());
        }
        if let Some(topic) = strip_prefix_ci(text, "look for ") {
            return Intent::LookFor(topic.trim().to_string());
        }

        // 4. Fixed phrases
        if literal.contains("say my name") {
            return Intent::SayMyName;
        }
        if literal.contains("what time is it") {
            return Intent::WhatTime;
        }
        if literal.contains("who are you") {
            return Intent::WhoAreYou;
        }
        if literal == "goodbye" || literal == "exit" {
            return Intent::Goodbye;
        }
        if literal == "search github for" {
            return Intent::SearchGithub(String::new());
        }
        if let Some(query) = strip_prefix_ci(text, "search github for ") {
            return Intent::SearchGithub(query.trim().to_string());
        }
        if literal.contains("help me") || literal.contains("i need you") {
            return Intent::Help;
        }

        // Memory
        if let Some(rest) = strip_prefix_ci(text, "remember ") {
            if let Some((key, value)) = split_once_ci(rest, " is ") {
                let (key, value) = (key.trim(), value.trim());
                if !key.is_empty() && !value.is_empty() {
                    return Intent::Remember {
                        key: key.to_lowercase(),
                        value: value.to_string(),
                    };
                }
            }
        }
        if let Some(key) = strip_prefix_ci(text, "recall ") {
            let key = key.trim();
            if !key.is_empty() {
                return Intent::Recall(key.to_lowercase());
            }
        }
        if let Some(key) = strip_prefix_ci(text, "forget ") {
            let key = key.trim();
            if !key.is_empty() {
                return Intent::Forget(key.to_lowercase());
            }
        }

        // 5. Fallback
        Intent::NotUnderstood
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Open(_) => "open",
            Intent::Close(_) => "close",
            Intent::Shutdown => "shutdown",
            Intent::Ask(_) => "ask",
            Intent::LookFor(_) => "look_for",
            Intent::SayMyName => "say_my_name",
            Intent::WhatTime => "what_time",
            Intent::WhoAreYou => "who_are_you",
            Intent::Goodbye => "goodbye",
            Intent::SearchGithub(_) => "search_github",
            Intent::Help => "help",
            Intent::Remember { .. } => "remember",
            Intent::Recall(_) => "recall",
            Intent::Forget(_) => "forget",
            Intent::NotUnderstood => "not_understood",
        }
    }
}

/// `text` without `prefix` when it starts with it, ignoring ASCII case
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Split around the first occurrence of an ASCII `separator`, ignoring case
fn split_once_ci<'a>(text: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let lower = text.to_ascii_lowercase();
    let idx = lower.find(separator)?;
    Some((&text[..idx], &text[idx + separator.len()..]))
}
