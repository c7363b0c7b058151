use gist_ingest::EmbeddingError;
use thiserror::Error;

use crate::algorithms::kmeans::ClusteringError;

/// What a single summarization call produced.
///
/// A degraded result still carries a usable summary (the leading sentences),
/// but it is never mistaken for a clustered one.
#[derive(Debug)]
pub enum SummaryOutcome {
    /// Representative sentences chosen by clustering.
    Summarized(String),
    /// The text already had no more sentences than requested.
    Unchanged(String),
    /// The main path could not run; `summary` holds the leading sentences.
    Degraded { summary: String, cause: DegradeCause },
    /// The input was refused before any work was done.
    Rejected(RejectReason),
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::Summarized(s) | Self::Unchanged(s) => Some(s),
            Self::Degraded { summary, .. } => Some(summary),
            Self::Rejected(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Why the clustering path fell back to the leading sentences.
#[derive(Debug, Error)]
pub enum DegradeCause {
    #[error("embedding model not loaded")]
    EmbedderNotLoaded,

    #[error("no sentence reaches {min_chars} characters")]
    NoEmbeddableSentences { min_chars: usize },

    #[error("embedding provider returned no vectors")]
    NoVectors,

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("clustering failed: {0}")]
    Clustering(#[from] ClusteringError),
}

/// Conditions reported to the caller instead of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("Text too short for summarization (minimum {min_chars} characters)")]
    InputTooShort { min_chars: usize },

    #[error("No sentences found in text")]
    NoSentences,

    #[error("Sentence count must be at least 1")]
    InvalidTargetCount,
}
