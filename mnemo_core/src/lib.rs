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

//! Domain types and capability traits shared by every `mnemo_*` crate.
//!
//! This crate has no I/O of its own: it defines the vocabulary (fragments,
//! scopes, messages, roles) and the trait seams (`EmbeddingAdapter`,
//! `LLMProvider`) that the rest of the workspace implements and depends on.

mod error;
mod fragment;
mod message;
mod provider;
mod role;
mod scope;

pub use error::Error;
pub use fragment::{Fragment, FragmentId, FragmentType, Sentiment, Speaker};
pub use message::{Message, MessageId};
pub use provider::{ChatMessage, ChatRole, EmbeddingAdapter, EmbeddingVariant, LLMProvider};
pub use role::Role;
pub use scope::Scope;

/// Deterministic SHA-256 hex digest of a `(namespace, content)` pair.
///
/// Used both for fragment dedup keys and for deriving filesystem/table-safe
/// scope partition keys.
#[must_use]
pub fn content_hash(namespace: &str, content: &str) -> String {
    use sha2::Digest;
    format!("{:x}", sha2::Sha256::digest(format!("{namespace}:{content}")))
}

pub type Result<T> = std::result::Result<T, Error>;
