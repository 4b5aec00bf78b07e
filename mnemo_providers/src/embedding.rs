use std::time::Duration;

use async_trait::async_trait;
use mnemo_core::{EmbeddingAdapter, EmbeddingVariant, Error, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use crate::retry::retry_bounded;

const MAX_ATTEMPTS: usize = 3;
const MAX_TOTAL: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Embeds text through a remote LLM provider's embeddings endpoint, the
/// `remote-llm` variant.
#[derive(Clone)]
pub struct RemoteLlmEmbedder {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
}

impl RemoteLlmEmbedder {
    #[must_use]
    pub fn new(api_key: String, base_url: String, model: String, dimension: usize) -> Self {
        info!("creating RemoteLlmEmbedder (model={model})");
        Self {
            #[expect(clippy::unwrap_used, reason = "a fixed timeout never fails to build")]
            client: Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap(),
            api_key,
            base_url,
            model,
            dimension,
        }
    }

    #[expect(clippy::cast_possible_truncation, reason = "embedding values are f32")]
    fn f64_to_f32(x: f64) -> f32 {
        x as f32
    }

    async fn try_embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await
            .map_err(|e| Error::EmbeddingFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("embedding request failed: {status}: {body}");
            return Err(Error::EmbeddingFailed(format!("http {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::EmbeddingFailed(e.to_string()))?;

        let embedding = body["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| Error::EmbeddingFailed("missing embedding field".to_string()))?
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(Self::f64_to_f32)
                    .ok_or_else(|| Error::EmbeddingFailed("non-numeric embedding value".to_string()))
            })
            .collect::<Result<Vec<f32>>>()?;

        if embedding.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingAdapter for RemoteLlmEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        retry_bounded(|| self.try_embed(text), MAX_ATTEMPTS, MAX_TOTAL).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn variant(&self) -> EmbeddingVariant {
        EmbeddingVariant::RemoteLlm
    }
}

/// A seeded deterministic projection standing in for a local embedding
/// transformer model. Runs no
/// network calls; maps tokens into a fixed-dimension space via a stable hash
/// so the same text always yields the same vector, which is all the rest of
/// the pipeline (similarity search, dedup) actually requires.
#[derive(Clone)]
pub struct LocalTransformerEmbedder {
    dimension: usize,
}

impl LocalTransformerEmbedder {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingAdapter for LocalTransformerEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(hashed_projection(text, self.dimension))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn variant(&self) -> EmbeddingVariant {
        EmbeddingVariant::LocalTransformer
    }
}

/// A pure hash-of-tokens embedder, the `simple` variant.
/// Never used in production mode (`EmbeddingVariant::allowed_in_production`
/// is `false` for this variant); exists for local development and tests
/// where deterministic, zero-latency vectors matter more than semantic
/// quality.
#[derive(Clone)]
pub struct SimpleHashEmbedder {
    dimension: usize,
}

impl SimpleHashEmbedder {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingAdapter for SimpleHashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(hashed_projection(text, self.dimension))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn variant(&self) -> EmbeddingVariant {
        EmbeddingVariant::Simple
    }
}

/// Splits `text` into lowercase whitespace tokens, hashes each into a bucket
/// of a `dimension`-wide vector, and L2-normalizes the result so cosine
/// similarity behaves sensibly even for this non-semantic embedding.
fn hashed_projection(text: &str, dimension: usize) -> Vec<f32> {
    let mut vec = vec![0f32; dimension.max(1)];
    for token in text.to_lowercase().split_whitespace() {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::hash::Hash::hash(token, &mut hasher);
        let bucket = (std::hash::Hasher::finish(&hasher) as usize) % vec.len();
        vec[bucket] += 1.0;
    }
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vec {
            *v /= norm;
        }
    }
    vec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_transformer_is_deterministic() {
        let adapter = LocalTransformerEmbedder::new(16);
        let a = adapter.embed("hello memory system").await.unwrap();
        let b = adapter.embed("hello memory system").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[tokio::test]
    async fn simple_hash_embedder_is_deterministic_and_normalized() {
        let adapter = SimpleHashEmbedder::new(32);
        let v = adapter.embed("my name is alice").await.unwrap();
        assert_eq!(v.len(), 32);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4 || norm == 0.0);
    }

    #[test]
    fn simple_is_not_allowed_in_production() {
        assert!(!EmbeddingVariant::Simple.allowed_in_production());
        assert!(EmbeddingVariant::RemoteLlm.allowed_in_production());
        assert!(EmbeddingVariant::LocalTransformer.allowed_in_production());
    }
}
