//! Deterministic feature-hashing embedder.
//!
//! Each lowercase alphanumeric token is hashed (FNV-1a) into one of
//! `dimensions` buckets with a ±1 sign taken from the top hash bit, then the
//! vector is L2-normalized. Needs no model, so it works offline and gives
//! stable vectors across runs and platforms.

use super::traits::{Embedder, EmbeddingError};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokens(text) {
            let hash = fnv1a(&token);
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "feature-hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_vector() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed("The quick brown fox").unwrap();
        let b = embedder.embed("the QUICK brown fox!").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn vectors_are_unit_length() {
        let embedder = HashEmbedder::new(32);
        let v = embedder.embed("some words to hash into buckets").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm = {norm}");
    }

    #[test]
    fn text_without_tokens_is_zero_vector() {
        let embedder = HashEmbedder::new(8);
        assert_eq!(embedder.embed("  ,;  ").unwrap(), vec![0.0; 8]);
    }

    #[test]
    fn different_texts_differ() {
        let embedder = HashEmbedder::new(256);
        let a = embedder.embed("rust compilers and borrow checking").unwrap();
        let b = embedder.embed("weather forecast for the weekend").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn batch_matches_single_calls() {
        let embedder = HashEmbedder::new(16);
        let batch = embedder.embed_batch(&["alpha beta", "gamma"]).unwrap();
        assert_eq!(batch[0], embedder.embed("alpha beta").unwrap());
        assert_eq!(batch[1], embedder.embed("gamma").unwrap());
    }
}
