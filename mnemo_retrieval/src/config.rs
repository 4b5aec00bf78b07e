use serde::{Deserialize, Serialize};

/// Retrieval tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub min_importance: u8,
    pub score_threshold: Option<f64>,
    pub boost_recent: bool,
    pub boost_importance: bool,
    /// Weight in `[0, 1]` applied to the max-similarity-to-admitted penalty
    /// during greedy diversity-penalized selection.
    pub diversity_penalty: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_importance: 5,
            score_threshold: None,
            boost_recent: true,
            boost_importance: true,
            diversity_penalty: 0.3,
        }
    }
}

/// Fixed over-fetch multiplier applied to `top_k` before re-ranking
///.
pub const OVER_FETCH_MULTIPLIER: usize = 3;
