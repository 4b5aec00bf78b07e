use chrono::Utc;
use mnemo_core::{Fragment, Result, Scope};
use mnemo_store::{Filters, Store};

use crate::config::{RetrievalConfig, OVER_FETCH_MULTIPLIER};
use crate::scoring::hybrid_score;

/// Selects the top fragments for a query by blending similarity,
/// importance, and recency, then greedily diversifying the selection
///.
pub struct HybridRetriever<'a> {
    store: &'a Store,
}

impl<'a> HybridRetriever<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Returns at most `config.top_k` fragments, sorted by selection order,
    /// never below `config.min_importance`, never duplicated.
    pub async fn select(
        &self,
        scope: &Scope,
        query_embedding: &[f32],
        config: &RetrievalConfig,
    ) -> Result<Vec<Fragment>> {
        let filters = Filters {
            min_importance: Some(config.min_importance),
            speaker: None,
            fragment_type: None,
        };

        let over_fetch = config.top_k.saturating_mul(OVER_FETCH_MULTIPLIER).max(config.top_k);
        let candidates = self.store.query(scope, query_embedding, &filters, over_fetch).await?;

        let now = Utc::now();
        let mut scored: Vec<(Fragment, f64)> = candidates
            .into_iter()
            .map(|scored| {
                let final_score = hybrid_score(
                    scored.score,
                    scored.fragment.importance_score,
                    scored.fragment.timestamp,
                    now,
                    config.boost_importance,
                    config.boost_recent,
                );
                (scored.fragment, final_score)
            })
            .collect();

        if let Some(threshold) = config.score_threshold {
            scored.retain(|(_, score)| *score >= threshold);
        }

        Ok(greedy_diversify(scored, config.top_k, config.diversity_penalty))
    }
}

/// Iteratively picks the highest-adjusted-score remaining candidate, where
/// the adjustment subtracts `diversity_penalty * max_sim_to_admitted`
/// from candidates whose embedding is similar to an
/// already-admitted fragment.
fn greedy_diversify(mut candidates: Vec<(Fragment, f64)>, top_k: usize, diversity_penalty: f64) -> Vec<Fragment> {
    let mut admitted: Vec<Fragment> = Vec::with_capacity(top_k.min(candidates.len()));

    while admitted.len() < top_k && !candidates.is_empty() {
        let mut best_idx = 0;
        let mut best_adjusted = f64::MIN;

        for (idx, (fragment, final_score)) in candidates.iter().enumerate() {
            let max_sim = admitted
                .iter()
                .map(|a| {
                    fragment
                        .embedding
                        .as_deref()
                        .zip(a.embedding.as_deref())
                        .map_or(0.0, |(x, y)| mnemo_store::cosine_similarity(x, y))
                })
                .fold(0.0_f64, f64::max);

            let adjusted = final_score - diversity_penalty * max_sim;
            if adjusted > best_adjusted {
                best_adjusted = adjusted;
                best_idx = idx;
            }
        }

        let (fragment, _) = candidates.remove(best_idx);
        admitted.push(fragment);
    }

    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::{FragmentType, Scope, Sentiment, Speaker};
    use std::collections::HashMap;

    fn fragment_with(content: &str, importance: i64, embedding: Vec<f32>) -> Fragment {
        let mut f = Fragment::new(
            content.to_string(),
            Speaker::User,
            FragmentType::Fact,
            Sentiment::Neutral,
            vec![],
            vec![],
            importance,
            0.9,
            Utc::now(),
            HashMap::new(),
        )
        .unwrap();
        f.embedding = Some(embedding);
        f
    }

    #[tokio::test]
    async fn select_respects_top_k_via_store_and_diversify() {
        let store = Store::connect("sqlite::memory:", 3).await.unwrap();
        let scope = Scope::new("u1", "s1", "default");

        for i in 0..10 {
            let mut fragment = fragment_with(&format!("fact {i}"), 8, vec![1.0, 0.0, 0.0]);
            fragment.embedding = Some(vec![1.0, 0.0, 0.0]);
            store.insert(&scope, &fragment).await.unwrap();
        }

        let retriever = HybridRetriever::new(&store);
        let config = RetrievalConfig { top_k: 3, ..RetrievalConfig::default() };
        let selected = retriever.select(&scope, &[1.0, 0.0, 0.0], &config).await.unwrap();

        assert!(selected.len() <= 3);
    }

    #[test]
    fn greedy_diversify_prefers_dissimilar_candidates_after_first() {
        let a = fragment_with("a", 8, vec![1.0, 0.0]);
        let b = fragment_with("b (near-duplicate of a)", 8, vec![0.99, 0.14]);
        let c = fragment_with("c (distinct)", 7, vec![0.0, 1.0]);

        let candidates = vec![(a, 0.9), (b, 0.85), (c, 0.7)];
        let admitted = greedy_diversify(candidates, 2, 0.5);

        assert_eq!(admitted.len(), 2);
        assert_eq!(admitted[0].content, "a");
        assert_eq!(admitted[1].content, "c (distinct)");
    }
}
