//! Shared startup wiring for every command that needs a live orchestrator:
//! connects the fragment store, picks an embedding adapter per
//! `EMBEDDING_MODEL`, and assembles the background extraction pool. One
//! place that turns `Config` into live collaborators, reused by every
//! command strategy.

use std::sync::Arc;

use mnemo_config::Config;
use mnemo_core::{EmbeddingAdapter, EmbeddingVariant, LLMProvider};
use mnemo_extraction::{ExtractionConfig, ExtractionEngine};
use mnemo_identity::{RoleRegistry, SessionStore, UserStore};
use mnemo_orchestrator::{JobScheduler, Orchestrator};
use mnemo_providers::{LocalTransformerEmbedder, RemoteLlmEmbedder, RemoteLlmProvider, SimpleHashEmbedder};
use mnemo_retrieval::RetrievalConfig;
use mnemo_store::Store;
use tracing::info;

/// The Zhipu-compatible endpoint the default remote backend talks to, since
/// `mnemo_config` has no separate provider-endpoint section to source it
/// from.
const BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
const CHAT_MODEL: &str = "glm-4-flash";
const EMBEDDING_MODEL: &str = "embedding-2";
const REMOTE_DIMENSION: usize = 1024;
const LOCAL_DIMENSION: usize = 256;
const EXTRACTION_WORKERS: usize = 4;
const WINDOW_MESSAGES: usize = 10;

pub struct Runtime {
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<Store>,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionStore>,
}

/// Picks the embedding adapter named by `config.embedding_model` and the
/// fixed dimension that goes with it; `Store::connect` is bound to the same
/// dimension so a mismatch fails fast on the very first insert rather than
/// silently truncating vectors.
fn build_embedder(config: &Config) -> (Arc<dyn EmbeddingAdapter>, usize) {
    match config.embedding_model {
        EmbeddingVariant::RemoteLlm => {
            let api_key = config
                .embedding_api_key
                .clone()
                .unwrap_or_else(|| config.reply_llm_api_key.clone());
            let embedder = RemoteLlmEmbedder::new(
                api_key,
                BASE_URL.to_string(),
                EMBEDDING_MODEL.to_string(),
                REMOTE_DIMENSION,
            );
            (Arc::new(embedder), REMOTE_DIMENSION)
        }
        EmbeddingVariant::LocalTransformer => {
            (Arc::new(LocalTransformerEmbedder::new(LOCAL_DIMENSION)), LOCAL_DIMENSION)
        }
        EmbeddingVariant::Simple => (Arc::new(SimpleHashEmbedder::new(LOCAL_DIMENSION)), LOCAL_DIMENSION),
    }
}

fn build_llm(config: &Config) -> Arc<dyn LLMProvider> {
    Arc::new(RemoteLlmProvider::new(
        config.reply_llm_api_key.clone(),
        BASE_URL.to_string(),
        CHAT_MODEL.to_string(),
    ))
}

/// Loads the role registry from `ROLE_REGISTRY_PATH` if set, otherwise
/// falls back to the built-in default assistant role.
async fn build_roles() -> anyhow::Result<RoleRegistry> {
    match std::env::var("ROLE_REGISTRY_PATH") {
        Ok(path) => {
            info!("loading role registry from {path}");
            Ok(RoleRegistry::load(std::path::Path::new(&path)).await?)
        }
        Err(_) => Ok(RoleRegistry::with_default_only()),
    }
}

pub async fn build(config: &Config) -> anyhow::Result<Runtime> {
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let (embedder, dimension) = build_embedder(config);
    let llm = build_llm(config);
    let roles = build_roles().await?;

    let database_url = format!("sqlite:{}/vectordb/memory.db?mode=rwc", config.data_dir.display());
    tokio::fs::create_dir_all(config.data_dir.join("vectordb")).await?;
    let store = Arc::new(Store::connect(&database_url, dimension).await?);

    let extraction_engine =
        Arc::new(ExtractionEngine::new(llm.clone(), ExtractionConfig::default()));
    let jobs = JobScheduler::start(extraction_engine, store.clone(), embedder.clone(), EXTRACTION_WORKERS);

    let users = Arc::new(UserStore::new(&config.data_dir));
    let sessions = Arc::new(SessionStore::new(&config.data_dir));

    let retrieval_config =
        RetrievalConfig { top_k: config.max_context_memories, ..RetrievalConfig::default() };

    let orchestrator = Arc::new(Orchestrator::new(
        roles,
        UserStore::new(&config.data_dir),
        SessionStore::new(&config.data_dir),
        store.clone(),
        embedder,
        llm,
        retrieval_config,
        jobs,
        config.memory_extract_threshold,
        WINDOW_MESSAGES,
    ));

    Ok(Runtime { orchestrator, store, users, sessions })
}
