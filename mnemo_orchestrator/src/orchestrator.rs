use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;
use mnemo_core::{EmbeddingAdapter, Error, LLMProvider, Message, Result, Scope, Speaker};
use mnemo_identity::{RoleRegistry, SessionStore, UserStore};
use mnemo_retrieval::{HybridRetriever, RetrievalConfig};
use mnemo_store::Store;
use tokio::sync::Mutex as AsyncMutex;
use tracing::warn;

use crate::jobs::JobScheduler;
use crate::prompt::build_messages;
use crate::session_state::SessionState;

const REPLY_TEMPERATURE: f32 = 0.7;
/// Per-session state untouched for longer than this is evicted from the
/// in-memory map on the next sweep. Durable history is unaffected; the next turn just rebuilds
/// a fresh `SessionState`.
const IDLE_EVICTION: i64 = 30 * 60;

/// Per-turn options.
#[derive(Debug, Clone, Default)]
pub struct ConversationOptions {
    /// Auto-create the user with this display name if it does not yet exist.
    pub username: Option<String>,
    /// Force extraction this turn regardless of the per-session counter.
    pub extract_now: bool,
    /// Per-call override of `RetrievalConfig::min_importance`. Spec.md §9
    /// treats `RetrievalConfig` as a value, not a mutable singleton: the
    /// process default is never mutated, only shadowed for this call.
    pub min_importance_override: Option<u8>,
    /// Per-call override of `RetrievalConfig::top_k`.
    pub max_context_memories_override: Option<usize>,
}

/// Observability/debugging metadata returned alongside the reply text.
#[derive(Debug, Clone)]
pub struct TurnMeta {
    pub fragments_used: usize,
    pub extraction_triggered: bool,
    /// Total number of durable messages recorded for this session so far.
    pub message_count: usize,
}

/// Coordinates one turn of conversation end to end: role and
/// user/session resolution, context retrieval, prompt assembly, the reply
/// call, durable persistence, and triggering background extraction.
///
/// Retrieval and persistence are kept as separate steps rather than one
/// combined read-modify-write: memories are read once for prompt assembly,
/// and the new turn is appended afterward.
pub struct Orchestrator {
    roles: RoleRegistry,
    users: UserStore,
    sessions: SessionStore,
    store: Arc<Store>,
    embedder: Arc<dyn EmbeddingAdapter>,
    llm: Arc<dyn LLMProvider>,
    retrieval_config: RetrievalConfig,
    jobs: Arc<JobScheduler>,
    extraction_threshold: u32,
    window_messages: usize,
    /// Locking order invariant: the outer map lock is held only long enough
    /// to look up or insert a session's `Arc<AsyncMutex<SessionState>>`,
    /// then dropped before the per-session lock is acquired. Never acquire
    /// the outer lock while holding a per-session lock.
    session_states: Mutex<HashMap<String, Arc<AsyncMutex<SessionState>>>>,
}

impl Orchestrator {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        roles: RoleRegistry,
        users: UserStore,
        sessions: SessionStore,
        store: Arc<Store>,
        embedder: Arc<dyn EmbeddingAdapter>,
        llm: Arc<dyn LLMProvider>,
        retrieval_config: RetrievalConfig,
        jobs: Arc<JobScheduler>,
        extraction_threshold: u32,
        window_messages: usize,
    ) -> Self {
        Self {
            roles,
            users,
            sessions,
            store,
            embedder,
            llm,
            retrieval_config,
            jobs,
            extraction_threshold,
            window_messages,
            session_states: Mutex::new(HashMap::new()),
        }
    }

    /// Runs one turn of conversation and returns the reply text plus
    /// metadata. Never blocks on extraction: a background job is only
    /// triggered, never awaited.
    pub async fn chat(
        &self,
        user_id: &str,
        session_id: &str,
        role_id: &str,
        user_text: &str,
        options: &ConversationOptions,
    ) -> Result<(String, TurnMeta)> {
        let role = self.roles.resolve(role_id)?;

        self.users.get_or_create(user_id, options.username.as_deref()).await?;
        self.sessions.get_or_create(session_id, user_id, role_id).await?;

        let scope = Scope::new(user_id, session_id, role_id);
        let state = self.session_state_for(session_id);
        let mut state = state.lock().await;
        state.touch();

        let user_message = Message::new(session_id, Speaker::User, user_text);
        state.buffer.push(user_message.clone());
        self.sessions
            .append_message(session_id, user_id, role_id, user_message)
            .await?;

        let mut retrieval_config = self.retrieval_config.clone();
        if let Some(min_importance) = options.min_importance_override {
            retrieval_config.min_importance = min_importance;
        }
        if let Some(top_k) = options.max_context_memories_override {
            retrieval_config.top_k = top_k;
        }

        let fragments = match self.embedder.embed(user_text).await {
            Ok(query_embedding) => {
                let retriever = HybridRetriever::new(&self.store);
                match retriever.select(&scope, &query_embedding, &retrieval_config).await {
                    Ok(fragments) => fragments,
                    Err(e) => {
                        warn!("retrieval failed, falling back to no memory context: {e}");
                        Vec::new()
                    }
                }
            }
            Err(e) => {
                warn!("embedding failed, falling back to no memory context: {e}");
                Vec::new()
            }
        };

        let history_tail = state.buffer.tail(self.window_messages);
        let messages = build_messages(role, &fragments, &history_tail, user_text);

        let reply_text = self
            .llm
            .complete(&messages, REPLY_TEMPERATURE)
            .await
            .map_err(|e| Error::LlmUnavailable(e.to_string()))?;

        let assistant_message = Message::new(session_id, Speaker::Assistant, reply_text.clone());
        state.buffer.push(assistant_message.clone());
        self.sessions
            .append_message(session_id, user_id, role_id, assistant_message)
            .await?;

        state.turns_since_extraction += 1;
        let extraction_triggered =
            options.extract_now || state.turns_since_extraction >= self.extraction_threshold;
        if extraction_triggered {
            state.turns_since_extraction = 0;
            let window = state.buffer.tail(self.window_messages);
            self.jobs.trigger(scope, window);
        }

        drop(state);
        self.evict_idle_sessions();

        let message_count = self
            .sessions
            .get(session_id)
            .await?
            .map_or(0, |record| record.messages.len());

        Ok((
            reply_text,
            TurnMeta { fragments_used: fragments.len(), extraction_triggered, message_count },
        ))
    }

    fn session_state_for(&self, session_id: &str) -> Arc<AsyncMutex<SessionState>> {
        let mut states = self.session_states.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        states
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(SessionState::new())))
            .clone()
    }

    /// Sweeps the in-memory session map for entries idle longer than
    /// `IDLE_EVICTION`, dropping them so memory use is bounded by active
    /// conversations rather than lifetime session count.
    fn evict_idle_sessions(&self) {
        let mut states = self.session_states.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        states.retain(|_, state| {
            state
                .try_lock()
                .map(|s| s.idle_for() < Duration::seconds(IDLE_EVICTION))
                .unwrap_or(true)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mnemo_core::EmbeddingVariant;
    use mnemo_extraction::{ExtractionConfig, ExtractionEngine};

    struct StubEmbedder {
        dimension: usize,
    }

    #[async_trait]
    impl EmbeddingAdapter for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0.0; self.dimension];
            v[0] = 1.0;
            Ok(v)
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn variant(&self) -> EmbeddingVariant {
            EmbeddingVariant::Simple
        }
    }

    struct StubLlm {
        response: String,
    }

    #[async_trait]
    impl LLMProvider for StubLlm {
        async fn complete(&self, _messages: &[mnemo_core::ChatMessage], _temperature: f32) -> Result<String> {
            Ok(self.response.clone())
        }
    }

    async fn test_harness(data_dir: &std::path::Path) -> Orchestrator {
        let store = Arc::new(Store::connect("sqlite::memory:", 3).await.unwrap());
        let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(StubEmbedder { dimension: 3 });
        let jobs = JobScheduler::start(
            Arc::new(ExtractionEngine::new(
                Arc::new(StubLlm { response: "not json".to_string() }),
                ExtractionConfig::default(),
            )),
            store.clone(),
            embedder.clone(),
            1,
        );

        Orchestrator::new(
            RoleRegistry::with_default_only(),
            UserStore::new(data_dir),
            SessionStore::new(data_dir),
            store,
            embedder,
            Arc::new(StubLlm { response: "hello there".to_string() }),
            RetrievalConfig::default(),
            jobs,
            100,
            10,
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn a_turn_produces_a_reply_and_persists_history() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = test_harness(dir.path()).await;

        let (reply, meta) = orchestrator
            .chat("u1", "s1", "default", "hi there", &ConversationOptions::default())
            .await
            .unwrap();

        assert_eq!(reply, "hello there");
        assert_eq!(meta.fragments_used, 0);
        assert!(!meta.extraction_triggered);
        assert_eq!(meta.message_count, 2);

        let session = orchestrator.sessions.get("s1").await.unwrap().unwrap();
        assert_eq!(session.messages.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn extract_now_forces_extraction_regardless_of_counter() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = test_harness(dir.path()).await;

        let options = ConversationOptions { extract_now: true, ..ConversationOptions::default() };
        let (_, meta) = orchestrator
            .chat("u1", "s1", "default", "hi there", &options)
            .await
            .unwrap();

        assert!(meta.extraction_triggered);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_role_is_rejected_before_any_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = test_harness(dir.path()).await;

        let result = orchestrator
            .chat("u1", "s1", "nonexistent-role", "hi", &ConversationOptions::default())
            .await;

        assert!(matches!(result, Err(Error::InvalidRole(_))));
        assert!(orchestrator.sessions.get("s1").await.unwrap().is_none());
    }
}
