use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Count mismatch: sent {expected} texts, got {actual} vectors")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding provider not configured: {0}")]
    NotConfigured(String),
}

/// A sentence-to-vector mapping (Ollama, OpenAI, hashing, fakes in tests).
///
/// Calls are blocking and independent of each other. Implementations must be
/// safe to share between threads; any locking is their own business.
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of texts, returning one vector per input text (in order).
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;

    /// Human-readable model identifier, for health and model listings.
    fn model_name(&self) -> &str;
}

/// Check that a backend answered with exactly one vector per input.
pub(crate) fn ensure_count(expected: usize, vectors: &[Vec<f32>]) -> Result<(), EmbeddingError> {
    if vectors.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: vectors.len(),
        });
    }
    Ok(())
}

/// Pull the single vector out of a one-element batch response.
pub(crate) fn single(mut vectors: Vec<Vec<f32>>) -> Result<Vec<f32>, EmbeddingError> {
    ensure_count(1, &vectors)?;
    vectors.pop().ok_or(EmbeddingError::CountMismatch {
        expected: 1,
        actual: 0,
    })
}
