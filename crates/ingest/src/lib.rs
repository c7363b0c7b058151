pub mod document;
pub mod embedding;

pub use document::splitter::{split_indexed, split_sentences};
pub use embedding::{create_embedder, Embedder, EmbeddingError};
