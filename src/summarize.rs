//! Summarization strategies.

use crate::error::Result;
use crate::llm::LlmClient;
use crate::usage::UsageMeter;
use std::sync::Arc;

/// A strategy that produces a summary for an article.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, article: &str) -> Result<String>;
}

/// LLM-backed summarizer rendering a prompt template over the article.
///
/// The base and fine-tuned strategies are two instances of this type with
/// different templates and model configurations.
pub struct LlmSummarizer {
    client: LlmClient,
    template: &'static str,
    meter: Arc<UsageMeter>,
}

impl LlmSummarizer {
    pub fn new(client: LlmClient, template: &'static str, meter: Arc<UsageMeter>) -> Self {
        Self {
            client,
            template,
            meter,
        }
    }

    /// The model id this summarizer generates with.
    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait::async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, article: &str) -> Result<String> {
        let prompt = self.template.replace("{article}", article);

        let response = self.client.complete(None, &prompt).await?;
        if let Some(usage) = response.usage {
            self.meter.record(usage);
        }

        Ok(response.content.trim().to_string())
    }
}
