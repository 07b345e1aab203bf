//! Embedding provider contract.

use async_trait::async_trait;

use crate::error::Result;

/// `embed(texts) -> vectors`, with a fixed dimensionality per model.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
 /// Embeds a batch of texts, one vector per input, in order.
 async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

 /// Dimensionality of vectors this provider produces.
 fn dimensions(&self) -> usize;
}
