#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

//! `EmbeddingAdapter` and `LLMProvider` implementations that talk to a
//! remote HTTP provider, plus local deterministic fallbacks for development
//! and tests.

mod embedding;
mod llm;
mod retry;

pub use embedding::{LocalTransformerEmbedder, RemoteLlmEmbedder, SimpleHashEmbedder};
pub use llm::RemoteLlmProvider;
pub use retry::retry_bounded;
