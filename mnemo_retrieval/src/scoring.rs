use chrono::{DateTime, Utc};

/// `importance_score / 10`, a fragment's contribution to the hybrid score
/// independent of query similarity.
#[must_use]
pub fn importance_weight(importance_score: u8) -> f64 {
    f64::from(importance_score) / 10.0
}

/// 1.0 for fragments at most a week old; decays by a factor of 0.95 per day
/// past that, floored to avoid ever reaching exactly zero.
#[must_use]
pub fn recency_factor(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_days = (now - timestamp).num_seconds().max(0) as f64 / 86_400.0;
    if age_days <= 7.0 {
        1.0
    } else {
        (0.95_f64.powf(age_days - 7.0)).max(1e-6)
    }
}

/// `base = boost_importance ? 0.7*similarity + 0.3*importance_weight : similarity`,
/// then optionally scaled by `recency_factor`.
#[must_use]
pub fn hybrid_score(
    similarity: f64,
    importance_score: u8,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    boost_importance: bool,
    boost_recent: bool,
) -> f64 {
    let base = if boost_importance {
        0.7 * similarity + 0.3 * importance_weight(importance_score)
    } else {
        similarity
    };

    if boost_recent {
        base * recency_factor(timestamp, now)
    } else {
        base
    }
}
