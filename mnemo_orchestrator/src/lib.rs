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

//! Per-turn conversation coordination: buffering, prompt assembly, the
//! reply call, durable persistence, and background extraction-job
//! scheduling.

mod buffer;
mod jobs;
mod orchestrator;
mod prompt;
mod session_state;

pub use buffer::MessageBuffer;
pub use jobs::{ExtractionJob, JobScheduler};
pub use orchestrator::{ConversationOptions, Orchestrator, TurnMeta};
