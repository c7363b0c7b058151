//! Request/response layer over the summarizer.
//!
//! Mirrors the JSON contract of a summarize endpoint: a request carries the
//! text, the sentence count and a method; the answer is either a summary with
//! length statistics or an `{ "error": ... }` message.

use std::fmt;
use std::sync::Arc;

use gist_core::Config;
use gist_ingest::create_embedder;
use gist_llm::{LlmRefiner, Refiner};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::pipeline::outcome::{RejectReason, SummaryOutcome};
use crate::pipeline::Summarizer;

/// How the summary is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SummaryMethod {
    /// Representative sentences picked by clustering.
    #[default]
    Extractive,
    /// The whole text rewritten by the generative model.
    Abstractive,
    /// Extractive selection, then rewritten by the generative model.
    Hybrid,
}

impl SummaryMethod {
    pub const ALL: [SummaryMethod; 3] = [Self::Extractive, Self::Abstractive, Self::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extractive => "extractive",
            Self::Abstractive => "abstractive",
            Self::Hybrid => "hybrid",
        }
    }
}

/// Unknown names fall back to extractive.
impl From<&str> for SummaryMethod {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "abstractive" => Self::Abstractive,
            "hybrid" => Self::Hybrid,
            _ => Self::Extractive,
        }
    }
}

impl From<String> for SummaryMethod {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for SummaryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_num_sentences() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_num_sentences")]
    pub num_sentences: usize,
    #[serde(default)]
    pub method: SummaryMethod,
}

impl SummarizeRequest {
    pub fn new(text: impl Into<String>, num_sentences: usize, method: SummaryMethod) -> Self {
        Self {
            text: text.into(),
            num_sentences,
            method,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub method: SummaryMethod,
    /// Characters in the trimmed input.
    pub original_length: usize,
    /// Characters in the summary.
    pub summary_length: usize,
    /// True when any stage fell back instead of running normally.
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeError {
    #[error("No text provided")]
    EmptyText,

    #[error("Text too short (minimum {min_chars} characters)")]
    TooShort { min_chars: usize },

    #[error("No sentences found in text")]
    NoSentences,

    #[error("num_sentences must be at least 1")]
    InvalidSentenceCount,
}

impl SummarizeError {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

impl From<RejectReason> for SummarizeError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::InputTooShort { min_chars } => Self::TooShort { min_chars },
            RejectReason::NoSentences => Self::NoSentences,
            RejectReason::InvalidTargetCount => Self::InvalidSentenceCount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// An embedding client is configured. Its server is not contacted, so
    /// an unreachable model still reports `true` until a summary degrades.
    pub embedder_loaded: bool,
    /// A chat client is configured; same caveat as `embedder_loaded`.
    pub refiner_loaded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodInfo {
    pub method: SummaryMethod,
    pub backend: String,
    pub available: bool,
}

/// Summarizer plus the optional generative refiner.
pub struct SummarizeService {
    summarizer: Summarizer,
    refiner: Option<Arc<dyn Refiner>>,
}

impl SummarizeService {
    pub fn new(summarizer: Summarizer, refiner: Option<Arc<dyn Refiner>>) -> Self {
        Self {
            summarizer,
            refiner,
        }
    }

    /// Wire up embedder and refiner from config. A collaborator that cannot be
    /// built is logged and left unloaded; the service still answers.
    pub fn from_config(config: &Config) -> Self {
        let embedder = create_embedder(&config.embedding, &config.ollama, &config.llm)
            .unwrap_or_else(|e| {
                warn!(error = %e, "embedder unavailable, extractive summaries will degrade");
                None
            });

        let refiner: Option<Arc<dyn Refiner>> =
            match LlmRefiner::from_config(&config.llm, &config.ollama) {
                Ok(r) => Some(Arc::new(r)),
                Err(e) => {
                    info!(error = %e, "no generative refiner configured");
                    None
                }
            };

        Self::new(Summarizer::from_config(config, embedder), refiner)
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn summarize(&self, request: &SummarizeRequest) -> Result<SummarizeResponse, SummarizeError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(SummarizeError::EmptyText);
        }
        if request.num_sentences == 0 {
            return Err(SummarizeError::InvalidSentenceCount);
        }

        let (extractive, mut degraded_reason) =
            match self.summarizer.summarize(text, request.num_sentences) {
                SummaryOutcome::Summarized(s) | SummaryOutcome::Unchanged(s) => (s, None),
                SummaryOutcome::Degraded { summary, cause } => (summary, Some(cause.to_string())),
                SummaryOutcome::Rejected(reason) => return Err(reason.into()),
            };

        let summary = match request.method {
            SummaryMethod::Extractive => extractive,
            SummaryMethod::Abstractive => match self.refine(text) {
                // The extractive fallback went unused.
                Ok(refined) => {
                    degraded_reason = None;
                    refined
                }
                Err(reason) => {
                    degraded_reason.get_or_insert(reason);
                    extractive
                }
            },
            SummaryMethod::Hybrid => match self.refine(&extractive) {
                Ok(refined) => refined,
                Err(reason) => {
                    degraded_reason.get_or_insert(reason);
                    extractive
                }
            },
        };

        Ok(SummarizeResponse {
            original_length: text.chars().count(),
            summary_length: summary.chars().count(),
            summary,
            method: request.method,
            degraded: degraded_reason.is_some(),
            degraded_reason,
        })
    }

    /// Run the refiner; `Err` carries the reason it could not.
    fn refine(&self, input: &str) -> Result<String, String> {
        let Some(refiner) = &self.refiner else {
            return Err("generative model not loaded".to_string());
        };

        refiner.refine(input).map_err(|e| {
            warn!(error = %e, "refinement failed, keeping extractive summary");
            format!("refinement failed: {e}")
        })
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            embedder_loaded: self.summarizer.embedder_loaded(),
            refiner_loaded: self.refiner.is_some(),
        }
    }

    pub fn available_methods(&self) -> Vec<MethodInfo> {
        let embedding = match self.summarizer.embedder() {
            Some(e) => format!("{} embeddings + k-means", e.model_name()),
            None => "leading sentences (no embedding model)".to_string(),
        };
        let generative = self.refiner.as_ref().map(|r| r.model().to_string());

        SummaryMethod::ALL
            .iter()
            .map(|&method| {
                let (backend, available) = match method {
                    SummaryMethod::Extractive => (embedding.clone(), true),
                    SummaryMethod::Abstractive => (
                        generative.clone().unwrap_or_else(|| "not loaded".to_string()),
                        generative.is_some(),
                    ),
                    SummaryMethod::Hybrid => (
                        format!(
                            "{} → {}",
                            embedding,
                            generative.as_deref().unwrap_or("not loaded")
                        ),
                        generative.is_some(),
                    ),
                };
                MethodInfo {
                    method,
                    backend,
                    available,
                }
            })
            .collect()
    }
}
