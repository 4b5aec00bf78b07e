//! Test-only helpers for assembling a full [`AppState`] against an
//! in-memory store and stub providers, shared by every route test module.

#![cfg(test)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mnemo_core::{ChatMessage, EmbeddingAdapter, EmbeddingVariant, LLMProvider, Result};
use mnemo_extraction::{ExtractionConfig, ExtractionEngine};
use mnemo_identity::{RoleRegistry, SessionStore, UserStore};
use mnemo_orchestrator::{JobScheduler, Orchestrator};
use mnemo_retrieval::RetrievalConfig;
use mnemo_store::Store;

use crate::state::AppState;

/// `Config::load` reads process-global environment variables; serialize
/// every test that touches them so parallel `cargo test` runs don't race
/// (same guard shape as `mnemo_config`'s own `ENV_LOCK`).
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

pub struct StubEmbedder;

#[async_trait]
impl EmbeddingAdapter for StubEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0, 0.0, 0.0])
    }

    fn dimension(&self) -> usize {
        3
    }

    fn variant(&self) -> EmbeddingVariant {
        EmbeddingVariant::Simple
    }
}

pub struct StubLlm {
    pub response: String,
}

#[async_trait]
impl LLMProvider for StubLlm {
    async fn complete(&self, _messages: &[ChatMessage], _temperature: f32) -> Result<String> {
        Ok(self.response.clone())
    }
}

pub fn test_config(data_dir: &Path) -> mnemo_config::Config {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    std::env::set_var("REPLY_LLM_API_KEY", "key");
    std::env::set_var("DATA_DIR", data_dir.to_string_lossy().to_string());
    std::env::remove_var("API_KEY");
    std::env::remove_var("ENVIRONMENT");
    let config = mnemo_config::Config::load().unwrap();
    std::env::remove_var("REPLY_LLM_API_KEY");
    std::env::remove_var("DATA_DIR");
    config
}

/// Builds a [`Config`] with a caller-chosen API key and environment,
/// guarded the same way as [`test_config`]. Lets `auth` tests exercise
/// every combination of key presence and `auth_required()` without each
/// test racing the others over process-global env vars.
pub fn test_config_with(data_dir: &Path, api_key: Option<&str>, production: bool) -> mnemo_config::Config {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    std::env::set_var("REPLY_LLM_API_KEY", "key");
    std::env::set_var("DATA_DIR", data_dir.to_string_lossy().to_string());
    match api_key {
        Some(key) => std::env::set_var("API_KEY", key),
        None => std::env::remove_var("API_KEY"),
    }
    std::env::set_var("ENVIRONMENT", if production { "production" } else { "development" });
    if production {
        std::env::set_var("EMBEDDING_MODEL", "remote-llm");
    } else {
        std::env::remove_var("EMBEDDING_MODEL");
    }
    let config = mnemo_config::Config::load().unwrap();
    std::env::remove_var("REPLY_LLM_API_KEY");
    std::env::remove_var("DATA_DIR");
    std::env::remove_var("API_KEY");
    std::env::remove_var("ENVIRONMENT");
    std::env::remove_var("EMBEDDING_MODEL");
    config
}

pub async fn test_state(data_dir: &Path) -> AppState {
    test_state_with_config(data_dir, test_config(data_dir)).await
}

/// Same assembly as [`test_state`], but with a config built by
/// [`test_config_with`] so auth tests can vary key/environment.
pub async fn test_state_with_config(data_dir: &Path, config: mnemo_config::Config) -> AppState {
    let store = Arc::new(Store::connect("sqlite::memory:", 3).await.unwrap());
    let engine = Arc::new(ExtractionEngine::new(
        Arc::new(StubLlm { response: "not json".to_string() }),
        ExtractionConfig::default(),
    ));
    let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(StubEmbedder);
    let jobs = JobScheduler::start(engine, store.clone(), embedder.clone(), 1);

    let orchestrator = Arc::new(Orchestrator::new(
        RoleRegistry::with_default_only(),
        UserStore::new(data_dir),
        SessionStore::new(data_dir),
        store.clone(),
        embedder,
        Arc::new(StubLlm { response: "hello there".to_string() }),
        RetrievalConfig::default(),
        jobs,
        100,
        10,
    ));

    AppState {
        orchestrator,
        store,
        users: Arc::new(UserStore::new(data_dir)),
        sessions: Arc::new(SessionStore::new(data_dir)),
        config: Arc::new(config),
    }
}
