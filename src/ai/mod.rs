//! AI chat completion
//!
//! The assistant only needs one operation from a language model: prompt in, reply out.

use crate::error::JarvisResult;
use async_trait::async_trait;

pub mod openrouter;

pub use openrouter::OpenRouterClient;

/// A remote chat model
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    /// Ask `prompt` and return the reply text
    async fn complete(&self, prompt: &str) -> JarvisResult<String>;

    /// Model identifier, for logs
    fn name(&self) -> &str;
}
