//! Extractive summarization pipeline.
//!
//! text → sentences → embeddings → k-means → one representative per cluster
//! → summary in reading order. Every failure between embedding and selection
//! collapses into the same degraded result: the first `target` sentences.

pub mod assembler;
pub mod outcome;
pub mod selector;

use std::sync::Arc;
use std::time::Instant;

use gist_core::config::{ClusteringConfig, Config, SummaryConfig};
use gist_core::Sentence;
use gist_ingest::{split_indexed, Embedder, EmbeddingError};
use tracing::{debug, info, warn};

use crate::algorithms::kmeans::kmeans;

use self::assembler::{assemble, leading_sentences};
use self::outcome::{DegradeCause, RejectReason, SummaryOutcome};
use self::selector::select_representatives;

/// Sentence-selection summarizer.
///
/// Holds no per-call state: the embedder handle is shared read-only and each
/// call builds its sentences, vectors and clusters from scratch.
pub struct Summarizer {
    embedder: Option<Arc<dyn Embedder>>,
    summary: SummaryConfig,
    clustering: ClusteringConfig,
}

impl Summarizer {
    /// Summarizer with default thresholds and clustering parameters.
    /// `None` means no embedding model is loaded.
    pub fn new(embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self::with_config(embedder, SummaryConfig::default(), ClusteringConfig::default())
    }

    pub fn with_config(
        embedder: Option<Arc<dyn Embedder>>,
        summary: SummaryConfig,
        clustering: ClusteringConfig,
    ) -> Self {
        Self {
            embedder,
            summary,
            clustering,
        }
    }

    pub fn from_config(config: &Config, embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self::with_config(embedder, config.summary.clone(), config.clustering.clone())
    }

    pub fn embedder_loaded(&self) -> bool {
        self.embedder.is_some()
    }

    pub fn embedder(&self) -> Option<&Arc<dyn Embedder>> {
        self.embedder.as_ref()
    }

    /// Summarize `text` down to at most `target` sentences.
    pub fn summarize(&self, text: &str, target: usize) -> SummaryOutcome {
        let min_chars = self.summary.min_text_chars;
        if text.trim().chars().count() < min_chars {
            debug!(min_chars, "input below minimum length");
            return SummaryOutcome::Rejected(RejectReason::InputTooShort { min_chars });
        }
        if target == 0 {
            return SummaryOutcome::Rejected(RejectReason::InvalidTargetCount);
        }

        let sentences = split_indexed(text);
        if sentences.is_empty() {
            return SummaryOutcome::Rejected(RejectReason::NoSentences);
        }
        if sentences.len() <= target {
            debug!(sentences = sentences.len(), target, "nothing to summarize");
            return SummaryOutcome::Unchanged(text.to_string());
        }

        let start = Instant::now();
        match self.extract(&sentences, target) {
            Ok(summary) => {
                info!(
                    sentences = sentences.len(),
                    target,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "extractive summary built"
                );
                SummaryOutcome::Summarized(summary)
            }
            Err(cause) => {
                warn!(cause = %cause, target, "falling back to leading sentences");
                SummaryOutcome::Degraded {
                    summary: leading_sentences(&sentences, target),
                    cause,
                }
            }
        }
    }

    /// Embedding, clustering and selection. Any error here means fallback.
    fn extract(&self, sentences: &[Sentence], target: usize) -> Result<String, DegradeCause> {
        let embedder = self.embedder.as_ref().ok_or(DegradeCause::EmbedderNotLoaded)?;

        let min_chars = self.summary.min_sentence_chars;
        let candidates: Vec<Sentence> = sentences
            .iter()
            .filter(|s| s.char_len() >= min_chars)
            .cloned()
            .collect();
        if candidates.is_empty() {
            return Err(DegradeCause::NoEmbeddableSentences { min_chars });
        }
        debug!(
            candidates = candidates.len(),
            skipped = sentences.len() - candidates.len(),
            "sentences eligible for embedding"
        );

        let texts: Vec<&str> = candidates.iter().map(|s| s.text.as_str()).collect();
        let raw = embedder.embed_batch(&texts)?;
        if raw.is_empty() {
            return Err(DegradeCause::NoVectors);
        }
        if raw.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: raw.len(),
            }
            .into());
        }

        let vectors: Vec<Vec<f64>> = raw
            .into_iter()
            .map(|v| v.into_iter().map(f64::from).collect())
            .collect();

        let k = target.min(vectors.len());
        let clustering = kmeans(&vectors, k, &self.clustering)?;
        debug!(
            k,
            iterations = clustering.iterations,
            inertia = clustering.inertia,
            "sentences clustered"
        );

        let selected = select_representatives(&candidates, &vectors, &clustering);
        Ok(assemble(selected))
    }
}
