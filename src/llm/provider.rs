use async_trait::async_trait;
use crate::error::Result;
use crate::llm::prompts::CompletionRequest;

/// Text in, text out. Any `Err` is treated as a transport failure.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
    fn name(&self) -> &str;
}
