//! Conversions between `mnemo_core::Fragment` and the sea-orm entity model.

use mnemo_core::{Fragment, FragmentType, Sentiment, Speaker};
use sea_orm::JsonValue;
use std::collections::HashMap;

use crate::entity::fragment;

#[allow(clippy::cast_possible_truncation)]
fn json_to_embedding(val: &JsonValue) -> Option<Vec<f32>> {
    let arr = val.as_array()?;
    Some(arr.iter().filter_map(|v| v.as_f64().map(|f| f as f32)).collect())
}

pub fn embedding_to_json(embedding: &[f32]) -> JsonValue {
    JsonValue::Array(
        embedding
            .iter()
            .map(|f| JsonValue::from(f64::from(*f)))
            .collect(),
    )
}

fn json_to_strings(val: &JsonValue) -> Vec<String> {
    val.as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn strings_to_json(values: &[String]) -> JsonValue {
    JsonValue::Array(values.iter().map(|s| JsonValue::from(s.clone())).collect())
}

fn json_to_metadata(val: &JsonValue) -> HashMap<String, String> {
    val.as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn metadata_to_json(metadata: &HashMap<String, String>) -> JsonValue {
    JsonValue::Object(
        metadata
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::from(v.clone())))
            .collect(),
    )
}

/// Reassembles a `Fragment` from a persisted row. Unknown/corrupt enum
/// strings fall back to a safe default rather than failing the whole query;
/// a row this malformed should never be written by this crate in the first
/// place.
pub fn fragment_from_model(m: fragment::Model) -> Fragment {
    Fragment {
        id: m.id,
        content: m.content,
        speaker: m.speaker.parse().unwrap_or(Speaker::User),
        fragment_type: m.fragment_type.parse().unwrap_or(FragmentType::Event),
        sentiment: m.sentiment.parse().unwrap_or(Sentiment::Neutral),
        entities: json_to_strings(&m.entities),
        topics: json_to_strings(&m.topics),
        importance_score: m.importance_score.clamp(1, 10) as u8,
        confidence: m.confidence,
        timestamp: m.timestamp,
        metadata: json_to_metadata(&m.metadata),
        embedding: m.embedding.as_ref().and_then(json_to_embedding),
    }
}

pub fn entities_json(fragment: &Fragment) -> JsonValue {
    strings_to_json(&fragment.entities)
}

pub fn topics_json(fragment: &Fragment) -> JsonValue {
    strings_to_json(&fragment.topics)
}

pub fn metadata_json(fragment: &Fragment) -> JsonValue {
    metadata_to_json(&fragment.metadata)
}
