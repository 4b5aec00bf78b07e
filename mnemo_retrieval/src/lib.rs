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

//! Hybrid similarity/importance/recency ranking with greedy
//! diversity-penalized selection.

mod config;
mod retriever;
mod scoring;

pub use config::{RetrievalConfig, OVER_FETCH_MULTIPLIER};
pub use retriever::HybridRetriever;
