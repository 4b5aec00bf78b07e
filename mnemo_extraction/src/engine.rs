use std::str::FromStr;

use mnemo_core::{ChatMessage, ChatRole, Fragment, FragmentType, LLMProvider, Message, Sentiment, Speaker};
use tracing::warn;

use crate::config::ExtractionConfig;
use crate::draft::ExtractionResponse;
use crate::markers;
use crate::window::build_transcript;

const SYSTEM_INSTRUCTIONS: &str = r#"You extract structured long-term memory fragments from a conversation window.

Return ONLY a JSON object of the shape:
{"fragments": [{"content": "...", "speaker": "user"|"assistant", "type": "event"|"preference"|"fact"|"relationship", "sentiment": "positive"|"neutral"|"negative", "entities": ["..."], "topics": ["..."], "importance_score": 1-10, "confidence": 0.0-1.0, "reasoning": "..."}]}

Score importance on a 1-10 scale using this rubric: durable facts about the user (name, occupation, relationships, strong preferences) score high; small talk and transient context score low. Every fragment must include a short "reasoning" string explaining the score.

Example:
Transcript:
[user] My name is Priya and I'm a backend engineer.
[assistant] Nice to meet you, Priya!

Output:
{"fragments": [{"content": "User's name is Priya, works as a backend engineer", "speaker": "user", "type": "fact", "sentiment": "neutral", "entities": ["Priya"], "topics": ["identity", "occupation"], "importance_score": 8, "confidence": 0.95, "reasoning": "durable identity fact"}]}
"#;

/// Extracts validated [`Fragment`]s from a conversation window by issuing
/// one scoring-LLM call, then applying rule-based post-correction and a
/// differentiated importance threshold.
pub struct ExtractionEngine {
    llm: std::sync::Arc<dyn LLMProvider>,
    config: ExtractionConfig,
}

impl ExtractionEngine {
    #[must_use]
    pub fn new(llm: std::sync::Arc<dyn LLMProvider>, config: ExtractionConfig) -> Self {
        Self { llm, config }
    }

    /// Run the full six-step pipeline over `window`. Never fails: an LLM
    /// error or malformed JSON response yields an empty list, logged at
    /// `warn`.
    pub async fn extract(&self, window: &[Message]) -> Vec<Fragment> {
        let transcript = build_transcript(window);

        let messages = [
            ChatMessage {
                role: ChatRole::System,
                content: SYSTEM_INSTRUCTIONS.to_string(),
            },
            ChatMessage {
                role: ChatRole::User,
                content: transcript,
            },
        ];

        let raw = match self.llm.complete(&messages, self.config.temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("extraction LLM call failed, yielding zero fragments: {e}");
                return Vec::new();
            }
        };

        let parsed: ExtractionResponse = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("extraction response was not valid JSON, yielding zero fragments: {e}");
                return Vec::new();
            }
        };

        let mut fragments: Vec<Fragment> = parsed
            .fragments
            .into_iter()
            .filter_map(Self::validate_and_correct)
            .filter(Fragment::survives_threshold)
            .collect();

        fragments.sort_unstable_by(|a, b| b.importance_score.cmp(&a.importance_score));
        fragments
    }

    /// Step 3 (parse/validate, per-fragment) and step 4 (rule-based
    /// post-correction). Returns `None` if the fragment's `speaker`,
    /// `type`, or `sentiment` do not normalize to a known variant.
    fn validate_and_correct(draft: crate::draft::FragmentDraft) -> Option<Fragment> {
        let speaker = Speaker::from_str(&draft.speaker).ok()?;
        let fragment_type = FragmentType::from_str(&draft.fragment_type).ok()?;
        let sentiment = Sentiment::from_str(&draft.sentiment).ok()?;

        let mut metadata = std::collections::HashMap::new();
        if !draft.reasoning.is_empty() {
            metadata.insert("reasoning".to_string(), draft.reasoning);
        }

        let mut fragment = Fragment::new(
            draft.content,
            speaker,
            fragment_type,
            sentiment,
            draft.entities,
            draft.topics,
            draft.importance_score,
            draft.confidence,
            chrono::Utc::now(),
            metadata,
        )
        .ok()?;

        apply_post_correction(&mut fragment);
        Some(fragment)
    }
}

/// Applies the four marker-based importance lifts, in order, each later
/// rule able to override an earlier one's floor on the same fragment.
fn apply_post_correction(fragment: &mut Fragment) {
    if fragment.speaker == Speaker::User && markers::matches_identity(&fragment.content) {
        fragment.importance_score = fragment.importance_score.max(5);
    }

    if fragment.speaker == Speaker::Assistant && markers::matches_commitment(&fragment.content) {
        fragment.importance_score = fragment.importance_score.max(7);
    }

    if fragment.speaker == Speaker::Assistant && markers::matches_advice(&fragment.content) {
        fragment.importance_score = fragment.importance_score.max(5);
    }

    if fragment.speaker == Speaker::Assistant && markers::matches_support(&fragment.content) {
        fragment.importance_score = fragment.importance_score.max(6);
    }

    if fragment.speaker == Speaker::User && markers::matches_quotation(&fragment.content) {
        fragment.importance_score = fragment.importance_score.max(7);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mnemo_core::Result;
    use std::sync::Arc;

    struct StubLlm {
        response: String,
    }

    #[async_trait]
    impl LLMProvider for StubLlm {
        async fn complete(&self, _messages: &[ChatMessage], _temperature: f32) -> Result<String> {
            Ok(self.response.clone())
        }
    }

    fn window() -> Vec<Message> {
        vec![Message::new("s1", Speaker::User, "hi")]
    }

    #[tokio::test]
    async fn malformed_json_yields_zero_fragments() {
        let engine = ExtractionEngine::new(
            Arc::new(StubLlm { response: "not json".to_string() }),
            ExtractionConfig::default(),
        );
        assert!(engine.extract(&window()).await.is_empty());
    }

    #[tokio::test]
    async fn low_importance_user_chitchat_is_dropped() {
        let response = serde_json::json!({
            "fragments": [{
                "content": "lol nice",
                "speaker": "user",
                "type": "event",
                "sentiment": "positive",
                "importance_score": 2,
                "confidence": 0.4,
                "reasoning": "small talk"
            }]
        })
        .to_string();

        let engine = ExtractionEngine::new(
            Arc::new(StubLlm { response }),
            ExtractionConfig::default(),
        );
        assert!(engine.extract(&window()).await.is_empty());
    }

    #[tokio::test]
    async fn identity_disclosure_is_lifted_above_threshold() {
        let response = serde_json::json!({
            "fragments": [{
                "content": "My name is Dana and I work as a nurse.",
                "speaker": "user",
                "type": "fact",
                "sentiment": "neutral",
                "importance_score": 2,
                "confidence": 0.7,
                "reasoning": "identity statement"
            }]
        })
        .to_string();

        let engine = ExtractionEngine::new(
            Arc::new(StubLlm { response }),
            ExtractionConfig::default(),
        );
        let fragments = engine.extract(&window()).await;
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].importance_score >= 5);
    }

    #[tokio::test]
    async fn assistant_commitment_is_lifted_above_threshold() {
        let response = serde_json::json!({
            "fragments": [{
                "content": "I promise to remind you about this every morning.",
                "speaker": "assistant",
                "type": "event",
                "sentiment": "positive",
                "importance_score": 3,
                "confidence": 0.8,
                "reasoning": "commitment"
            }]
        })
        .to_string();

        let engine = ExtractionEngine::new(
            Arc::new(StubLlm { response }),
            ExtractionConfig::default(),
        );
        let fragments = engine.extract(&window()).await;
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].importance_score >= 7);
    }

    #[tokio::test]
    async fn unknown_variant_drops_just_that_fragment() {
        let response = serde_json::json!({
            "fragments": [{
                "content": "bogus row",
                "speaker": "alien",
                "type": "fact",
                "sentiment": "neutral",
                "importance_score": 9,
                "confidence": 0.9,
                "reasoning": "n/a"
            }]
        })
        .to_string();

        let engine = ExtractionEngine::new(
            Arc::new(StubLlm { response }),
            ExtractionConfig::default(),
        );
        assert!(engine.extract(&window()).await.is_empty());
    }
}
