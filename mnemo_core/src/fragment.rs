use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned to a [`Fragment`] on insert into the store.
pub type FragmentId = Uuid;

/// Which side of the conversation a fragment was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Speaker {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(crate::Error::InvalidVariant {
                field: "speaker",
                value: other.to_string(),
            }),
        }
    }
}

/// Coarse classification of what a fragment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentType {
    Event,
    Preference,
    Fact,
    Relationship,
}

impl std::fmt::Display for FragmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Preference => write!(f, "preference"),
            Self::Fact => write!(f, "fact"),
            Self::Relationship => write!(f, "relationship"),
        }
    }
}

impl FromStr for FragmentType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(Self::Event),
            "preference" => Ok(Self::Preference),
            "fact" => Ok(Self::Fact),
            "relationship" => Ok(Self::Relationship),
            other => Err(crate::Error::InvalidVariant {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

/// Sentiment polarity attached to a fragment by the extraction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(crate::Error::InvalidVariant {
                field: "sentiment",
                value: other.to_string(),
            }),
        }
    }
}

/// A single atomic recollection extracted from conversation.
///
/// Fragments are immutable once inserted: there is no update path, only
/// insert, query, and scope-level delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub id: FragmentId,
    pub content: String,
    pub speaker: Speaker,
    pub fragment_type: FragmentType,
    pub sentiment: Sentiment,
    pub entities: Vec<String>,
    pub topics: Vec<String>,
    /// Integer in `1..=10`; invariant enforced by `Fragment::new`.
    pub importance_score: u8,
    /// Float in `0.0..=1.0`.
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
    /// Embedding vector, dimension fixed by the store's bound adapter.
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
}

impl Fragment {
    /// Build a fragment, clamping `importance_score` into `1..=10` and
    /// `confidence` into `0.0..=1.0` as the extraction engine's
    /// parse-and-validate step requires.
    ///
    /// # Errors
    /// Returns [`crate::Error::EmptyContent`] if `content` is empty after
    /// trimming.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        content: String,
        speaker: Speaker,
        fragment_type: FragmentType,
        sentiment: Sentiment,
        entities: Vec<String>,
        topics: Vec<String>,
        importance_score: i64,
        confidence: f32,
        timestamp: DateTime<Utc>,
        metadata: HashMap<String, String>,
    ) -> crate::Result<Self> {
        if content.trim().is_empty() {
            return Err(crate::Error::EmptyContent);
        }

        Ok(Self {
            id: Uuid::now_v7(),
            content,
            speaker,
            fragment_type,
            sentiment,
            entities,
            topics,
            importance_score: importance_score.clamp(1, 10) as u8,
            confidence: confidence.clamp(0.0, 1.0),
            timestamp,
            metadata,
            embedding: None,
        })
    }

    /// Content-hash key used for dedup within a scope: `(content, speaker)`.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        crate::content_hash("fragment", &format!("{}:{}", self.speaker, self.content))
    }

    /// The differentiated importance threshold: user fragments below 5 and
    /// assistant fragments below 3 are dropped.
    #[must_use]
    pub const fn survives_threshold(&self) -> bool {
        match self.speaker {
            Speaker::User => self.importance_score >= 5,
            Speaker::Assistant => self.importance_score >= 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(score: i64, speaker: Speaker) -> Fragment {
        Fragment::new(
            "hello".to_string(),
            speaker,
            FragmentType::Fact,
            Sentiment::Neutral,
            vec![],
            vec![],
            score,
            0.8,
            Utc::now(),
            HashMap::new(),
        )
        .expect("valid fragment")
    }

    #[test]
    fn importance_score_clamped_into_range() {
        assert_eq!(make(99, Speaker::User).importance_score, 10);
        assert_eq!(make(-5, Speaker::User).importance_score, 1);
        assert_eq!(make(7, Speaker::User).importance_score, 7);
    }

    #[test]
    fn empty_content_rejected() {
        let err = Fragment::new(
            "   ".to_string(),
            Speaker::User,
            FragmentType::Fact,
            Sentiment::Neutral,
            vec![],
            vec![],
            5,
            0.5,
            Utc::now(),
            HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, crate::Error::EmptyContent));
    }

    #[test]
    fn differentiated_threshold() {
        assert!(!make(4, Speaker::User).survives_threshold());
        assert!(make(5, Speaker::User).survives_threshold());
        assert!(!make(2, Speaker::Assistant).survives_threshold());
        assert!(make(3, Speaker::Assistant).survives_threshold());
    }

    #[test]
    fn variant_round_trip() {
        for s in ["event", "preference", "fact", "relationship"] {
            assert_eq!(FragmentType::from_str(s).expect("valid").to_string(), s);
        }
        for s in ["positive", "neutral", "negative"] {
            assert_eq!(Sentiment::from_str(s).expect("valid").to_string(), s);
        }
        assert!(FragmentType::from_str("bogus").is_err());
    }
}
