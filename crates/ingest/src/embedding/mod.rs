pub mod cache;
pub mod hash;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use gist_core::config::{EmbeddingConfig, LlmConfig, OllamaConfig};
use tracing::info;

pub use cache::CachedEmbedder;
pub use hash::HashEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Create the configured embedder, wrapped in an LRU cache when enabled.
///
/// `Ok(None)` means embeddings are deliberately switched off (`none`); the
/// summarizer then treats the model as not loaded.
pub fn create_embedder(
    embedding: &EmbeddingConfig,
    ollama: &OllamaConfig,
    llm: &LlmConfig,
) -> Result<Option<Arc<dyn Embedder>>, EmbeddingError> {
    let base: Arc<dyn Embedder> = match embedding.provider.as_str() {
        "none" | "off" => return Ok(None),
        "ollama" => Arc::new(OllamaEmbedder::new(
            ollama.url.clone(),
            ollama.embedding_model.clone(),
            embedding.dimensions,
        )),
        "openai" => {
            let api_key = llm
                .openai_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Arc::new(OpenAiEmbedder::new(
                api_key.clone(),
                llm.openai_embedding_model.clone(),
                llm.openai_base_url.clone(),
                embedding.dimensions,
            ))
        }
        "hash" => Arc::new(HashEmbedder::new(embedding.dimensions)),
        other => {
            return Err(EmbeddingError::NotConfigured(format!(
                "unknown embedding provider: '{}'",
                other
            )))
        }
    };

    info!(
        provider = %embedding.provider,
        model = base.model_name(),
        cache_size = embedding.cache_size,
        "embedder ready"
    );

    if embedding.cache_size == 0 {
        return Ok(Some(base));
    }
    Ok(Some(Arc::new(CachedEmbedder::new(base, embedding.cache_size))))
}
