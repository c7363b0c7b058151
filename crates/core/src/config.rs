use std::env;

use serde::{Deserialize, Serialize};

use crate::error::GistError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub summary: SummaryConfig,
    pub clustering: ClusteringConfig,
    pub embedding: EmbeddingConfig,
    pub ollama: OllamaConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `GIST_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("GIST_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            summary: SummaryConfig::from_env_profiled(p),
            clustering: ClusteringConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  summary:     min_text_chars={}, min_sentence_chars={}, default_sentences={}",
            self.summary.min_text_chars,
            self.summary.min_sentence_chars,
            self.summary.default_sentences
        );
        tracing::info!(
            "  clustering:  seed={}, restarts={}, max_iterations={}",
            self.clustering.seed,
            self.clustering.restarts,
            self.clustering.max_iterations
        );
        tracing::info!("  embedding:   provider={}", self.embedding.provider);
        tracing::info!("  ollama:      url={}", self.ollama.url);
        tracing::info!("  llm:         provider={}", self.llm.provider);
    }

    /// Reject values that would make every summary degenerate.
    pub fn validate(&self) -> Result<(), GistError> {
        if self.summary.default_sentences == 0 {
            return Err(GistError::Config(
                "SUMMARY_DEFAULT_SENTENCES must be at least 1".into(),
            ));
        }
        if self.clustering.restarts == 0 {
            return Err(GistError::Config("KMEANS_RESTARTS must be at least 1".into()));
        }
        if !(self.clustering.tolerance.is_finite() && self.clustering.tolerance >= 0.0) {
            return Err(GistError::Config(format!(
                "KMEANS_TOLERANCE must be a non-negative number, got {}",
                self.clustering.tolerance
            )));
        }
        if self.embedding.dimensions == 0 {
            return Err(GistError::Config("EMBEDDING_DIMENSIONS must be positive".into()));
        }
        Ok(())
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "summary": {
                "min_text_chars": self.summary.min_text_chars,
                "min_sentence_chars": self.summary.min_sentence_chars,
                "default_sentences": self.summary.default_sentences,
                "default_method": self.summary.default_method,
            },
            "clustering": {
                "seed": self.clustering.seed,
                "restarts": self.clustering.restarts,
                "max_iterations": self.clustering.max_iterations,
            },
            "embedding": {
                "provider": self.embedding.provider,
                "dimensions": self.embedding.dimensions,
                "cache_size": self.embedding.cache_size,
            },
            "ollama": {
                "url": self.ollama.url,
                "model": self.ollama.model,
                "embedding_model": self.ollama.embedding_model,
            },
            "llm": {
                "provider": self.llm.provider,
                "configured": self.llm.is_configured(),
            },
        })
    }
}

// ── Summary thresholds ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Trimmed input shorter than this is rejected outright.
    pub min_text_chars: usize,
    /// Sentences shorter than this are never embedded or selected.
    pub min_sentence_chars: usize,
    pub default_sentences: usize,
    /// "extractive", "abstractive", "hybrid"
    pub default_method: String,
}

impl SummaryConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            min_text_chars: profiled_env_parse(p, "SUMMARY_MIN_TEXT_CHARS", 50),
            min_sentence_chars: profiled_env_parse(p, "SUMMARY_MIN_SENTENCE_CHARS", 10),
            default_sentences: profiled_env_parse(p, "SUMMARY_DEFAULT_SENTENCES", 2),
            default_method: profiled_env_or(p, "SUMMARY_DEFAULT_METHOD", "extractive"),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 50,
            min_sentence_chars: 10,
            default_sentences: 2,
            default_method: "extractive".to_string(),
        }
    }
}

// ── K-means ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub seed: u64,
    /// Independent k-means++ restarts; the lowest-inertia run wins.
    pub restarts: usize,
    pub max_iterations: usize,
    /// Stop early once total centroid movement (squared) drops below this.
    pub tolerance: f64,
}

impl ClusteringConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            seed: profiled_env_parse(p, "KMEANS_SEED", defaults.seed),
            restarts: profiled_env_parse(p, "KMEANS_RESTARTS", defaults.restarts),
            max_iterations: profiled_env_parse(p, "KMEANS_MAX_ITERATIONS", defaults.max_iterations),
            tolerance: profiled_env_parse(p, "KMEANS_TOLERANCE", defaults.tolerance),
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama", "openai", "hash", "none"
    pub provider: String,
    pub dimensions: usize,
    /// LRU entries kept per process; 0 disables the cache.
    pub cache_size: usize,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "EMBEDDING_PROVIDER", "ollama"),
            dimensions: profiled_env_parse(p, "EMBEDDING_DIMENSIONS", 768),
            cache_size: profiled_env_parse(p, "EMBEDDING_CACHE_SIZE", 1024),
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            embedding_model: profiled_env_or(p, "OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── LLM (generative refinement) ───────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama", "openai", "none"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_embedding_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "ollama"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_embedding_model: profiled_env_or(
                p,
                "OPENAI_EMBEDDING_MODEL",
                "text-embedding-3-small",
            ),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            temperature: profiled_env_parse(p, "LLM_TEMPERATURE", 0.1),
            max_tokens: profiled_env_parse(p, "LLM_MAX_TOKENS", 256),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiled_key_overrides_plain_key() {
        env::set_var("GISTCFGA_KMEANS_SEED", "7");
        env::set_var("GISTCFGA_SUMMARY_MIN_TEXT_CHARS", "80");
        let config = Config::for_profile("gistcfga");

        assert_eq!(config.profile, "GISTCFGA");
        assert_eq!(config.clustering.seed, 7);
        assert_eq!(config.summary.min_text_chars, 80);
    }

    #[test]
    fn unparsable_values_fall_back_to_defaults() {
        env::set_var("GISTCFGB_KMEANS_RESTARTS", "many");
        let config = Config::for_profile("GISTCFGB");
        assert_eq!(config.clustering.restarts, ClusteringConfig::default().restarts);
    }

    #[test]
    fn validate_rejects_zero_restarts() {
        env::set_var("GISTCFGD_KMEANS_RESTARTS", "0");
        let config = Config::for_profile("GISTCFGD");
        assert!(matches!(config.validate(), Err(GistError::Config(_))));

        env::set_var("GISTCFGD_KMEANS_RESTARTS", "3");
        assert!(Config::for_profile("GISTCFGD").validate().is_ok());
    }

    #[test]
    fn redacted_summary_never_contains_api_key() {
        env::set_var("GISTCFGC_OPENAI_API_KEY", "sk-secret-value");
        env::set_var("GISTCFGC_LLM_PROVIDER", "openai");
        let config = Config::for_profile("GISTCFGC");

        assert!(config.llm.is_configured());
        let rendered = config.redacted_summary().to_string();
        assert!(!rendered.contains("sk-secret-value"));
        assert_eq!(config.profile_label(), "GISTCFGC");
    }
}
