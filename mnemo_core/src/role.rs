use serde::{Deserialize, Serialize};

/// A static persona configuration loaded once at startup. Participates only
/// in prompt assembly and scope partitioning; never alters the extraction or
/// retrieval contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub role_id: String,
    pub name: String,
    pub system_prompt: String,
    #[serde(default)]
    pub response_style: Option<String>,
    #[serde(default)]
    pub forbidden_vocab: Vec<String>,
    #[serde(default)]
    pub high_frequency_vocab: Vec<String>,
    #[serde(default)]
    pub few_shot_examples: Vec<FewShotExample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FewShotExample {
    pub user: String,
    pub assistant: String,
}

impl Role {
    /// A minimal default role used when no role registry file is configured.
    #[must_use]
    pub fn default_assistant() -> Self {
        Self {
            role_id: "default".to_string(),
            name: "Assistant".to_string(),
            system_prompt: "You are a helpful AI assistant.".to_string(),
            response_style: None,
            forbidden_vocab: Vec::new(),
            high_frequency_vocab: Vec::new(),
            few_shot_examples: Vec::new(),
        }
    }
}
