use serde::Deserialize;

/// The raw shape the scoring LLM is asked to emit for one fragment, before
/// validation.
#[derive(Debug, Deserialize)]
pub struct FragmentDraft {
    pub content: String,
    pub speaker: String,
    #[serde(rename = "type")]
    pub fragment_type: String,
    pub sentiment: String,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub importance_score: i64,
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractionResponse {
    pub fragments: Vec<FragmentDraft>,
}
