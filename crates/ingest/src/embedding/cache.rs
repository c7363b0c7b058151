use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use lru::LruCache;
use tracing::debug;

use super::traits::{ensure_count, Embedder, EmbeddingError};

/// Wraps another embedder with an LRU cache keyed by text hash.
///
/// Only cache misses are forwarded, as one batch, to the inner embedder.
/// The lock is never held across the inner call.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: Mutex<LruCache<u64, Vec<f32>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn hash_text(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    fn lookup(&self, key: u64) -> Option<Vec<f32>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(&key).cloned()
    }

    fn store(&self, key: u64, embedding: Vec<f32>) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(key, embedding);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }
}

impl Embedder for CachedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = Self::hash_text(text);
        if let Some(vec) = self.lookup(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(vec);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let vec = self.inner.embed(text)?;
        self.store(key, vec.clone());
        Ok(vec)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let keys: Vec<u64> = texts.iter().map(|t| Self::hash_text(t)).collect();
        let mut out: Vec<Option<Vec<f32>>> = keys.iter().map(|&k| self.lookup(k)).collect();

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
        self.hits
            .fetch_add((texts.len() - missing.len()) as u64, Ordering::Relaxed);
        self.misses.fetch_add(missing.len() as u64, Ordering::Relaxed);

        if !missing.is_empty() {
            let to_embed: Vec<&str> = missing.iter().map(|&i| texts[i]).collect();
            debug!(misses = to_embed.len(), total = texts.len(), "embedding cache misses");
            let fresh = self.inner.embed_batch(&to_embed)?;
            ensure_count(to_embed.len(), &fresh)?;
            for (&i, vec) in missing.iter().zip(fresh) {
                self.store(keys[i], vec.clone());
                out[i] = Some(vec);
            }
        }

        Ok(out.into_iter().flatten().collect())
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
