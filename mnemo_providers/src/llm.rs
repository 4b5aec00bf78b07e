use std::time::Duration;

use async_trait::async_trait;
use mnemo_core::{ChatMessage, ChatRole, Error, LLMProvider, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use crate::retry::retry_bounded;

const MAX_ATTEMPTS: usize = 3;
const MAX_TOTAL: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const fn role_to_wire(role: ChatRole) -> &'static str {
    match role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    }
}

/// An OpenAI-compatible chat completions client, used for both reply
/// generation and fragment-extraction scoring.
#[derive(Clone)]
pub struct RemoteLlmProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl RemoteLlmProvider {
    #[must_use]
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        info!("creating RemoteLlmProvider (model={model})");
        Self {
            #[expect(clippy::unwrap_used, reason = "a fixed timeout never fails to build")]
            client: Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap(),
            api_key,
            base_url,
            model,
        }
    }

    async fn try_complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let wire_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                json!({
                    "role": role_to_wire(m.role),
                    "content": m.content,
                })
            })
            .collect();

        let request = json!({
            "model": self.model,
            "messages": wire_messages,
            "temperature": temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::LlmUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("llm request failed: {status}: {body}");
            return Err(Error::LlmUnavailable(format!("http {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::LlmUnavailable(e.to_string()))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::LlmMalformedOutput("missing choices[0].message.content".to_string()))
    }
}

#[async_trait]
impl LLMProvider for RemoteLlmProvider {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        retry_bounded(
            || self.try_complete(messages, temperature),
            MAX_ATTEMPTS,
            MAX_TOTAL,
        )
        .await
    }
}
