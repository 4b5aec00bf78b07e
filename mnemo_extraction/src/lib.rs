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

//! Conversation-window extraction: one scoring-LLM call, defensive parsing,
//! rule-based post-correction, and a differentiated importance threshold
//!.

mod config;
mod draft;
mod engine;
mod markers;
mod window;

pub use config::ExtractionConfig;
pub use engine::ExtractionEngine;
