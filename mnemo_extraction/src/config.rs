use serde::{Deserialize, Serialize};

/// Tunables for the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Sampling temperature for the scoring LLM call; pinned low for
    /// determinism.
    pub temperature: f32,
    /// Every Nth turn triggers extraction (owned by the orchestrator, but
    /// surfaced here so the engine's window-size guidance stays in one
    /// place: `window_messages` should be at least `threshold * 2`).
    pub threshold: u32,
    /// Number of trailing messages assembled into one extraction window.
    pub window_messages: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            threshold: 5,
            window_messages: 10,
        }
    }
}
