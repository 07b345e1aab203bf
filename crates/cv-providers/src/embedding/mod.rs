//! Embedding provider adapters, a collaborator of the vector store.

pub mod http;

pub use http::{HttpEmbeddingConfig, HttpEmbeddingProvider};
