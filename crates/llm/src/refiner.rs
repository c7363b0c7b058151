use gist_core::config::{LlmConfig, OllamaConfig};
use tracing::{debug, info};

use crate::provider::{LlmError, LlmProvider, Message};

const SYSTEM_PROMPT: &str = "You condense text. Reply with a short abstractive summary \
of the user's text in plain prose: no preamble, no bullet points, no quotes.";

/// Prefix the user text the way T5-style summarizers expect it.
const TASK_PREFIX: &str = "summarize: ";

/// A generative rewriting step layered on top of extractive selection.
///
/// Failures are reported, never swallowed; the caller decides what to fall
/// back to.
pub trait Refiner: Send + Sync {
    fn refine(&self, text: &str) -> Result<String, LlmError>;

    /// Model identifier, for health and model listings.
    fn model(&self) -> &str;
}

/// Refiner backed by a chat-completion provider.
pub struct LlmRefiner {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmRefiner {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(
        llm_config: &LlmConfig,
        ollama_config: &OllamaConfig,
    ) -> Result<Self, LlmError> {
        let provider = crate::providers::create_provider(llm_config, ollama_config)?;
        info!(provider = %llm_config.provider, model = provider.model(), "refiner ready");
        Ok(Self::new(provider, llm_config.temperature, llm_config.max_tokens))
    }
}

impl Refiner for LlmRefiner {
    fn refine(&self, text: &str) -> Result<String, LlmError> {
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(format!("{TASK_PREFIX}{text}")),
        ];

        let response = self
            .provider
            .complete(&messages, self.temperature, self.max_tokens)?;
        debug!(chars = response.len(), "refiner response");

        let refined = response.trim();
        if refined.is_empty() {
            return Err(LlmError::ParseError("empty completion".into()));
        }
        Ok(refined.to_string())
    }

    fn model(&self) -> &str {
        self.provider.model()
    }
}
