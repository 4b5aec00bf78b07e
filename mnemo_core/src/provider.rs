use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The three embedding variants a deployment can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbeddingVariant {
    RemoteLlm,
    LocalTransformer,
    Simple,
}

impl EmbeddingVariant {
    /// `simple` is rejected at startup in `production` mode.
    #[must_use]
    pub const fn allowed_in_production(self) -> bool {
        !matches!(self, Self::Simple)
    }
}

impl std::str::FromStr for EmbeddingVariant {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote-llm" => Ok(Self::RemoteLlm),
            "local-transformer" => Ok(Self::LocalTransformer),
            "simple" => Ok(Self::Simple),
            other => Err(crate::Error::ConfigInvalid(format!(
                "unknown EMBEDDING_MODEL variant: {other}"
            ))),
        }
    }
}

/// Maps text to a fixed-dimension float vector. Implementations are pure:
/// the same text yields the same vector for the lifetime of an adapter
/// instance.
///
/// A bound adapter is immutable for the lifetime of a store partition;
/// switching variants on an existing partition is a startup refusal, not a
/// runtime concern of this trait.
#[async_trait]
pub trait EmbeddingAdapter: Send + Sync {
    /// Embed a single piece of text.
    async fn embed(&self, text: &str) -> crate::Result<Vec<f32>>;

    /// Embed a batch of texts. The default loops `embed`; implementations
    /// backed by a batching API should override this to issue one request.
    async fn embed_batch(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Fixed output dimension this adapter produces.
    fn dimension(&self) -> usize;

    /// Which of the three recognized variants this adapter implements.
    fn variant(&self) -> EmbeddingVariant;
}

/// A single chat message role/content pair sent to the reply or scoring LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Capability seam for both the reply LLM and the scoring LLM.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Issue a chat completion request at the given temperature and return
    /// the raw text content.
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> crate::Result<String>;
}
