use std::sync::Arc;

use mnemo_config::Config;
use mnemo_identity::{SessionStore, UserStore};
use mnemo_orchestrator::Orchestrator;
use mnemo_store::Store;

/// Process-wide singletons the HTTP surface reads from on every request:
/// constructed once at startup and passed explicitly, never re-acquired
///.
///
/// `users` and `sessions` are separate instances from the ones the
/// [`Orchestrator`] holds internally, both pointed at the same `data_dir` —
/// the flat-file collaborators have no shared mutable state beyond atomic
/// file writes, so two independently constructed handles are as safe as
/// one shared reference and avoid threading a getter through the
/// orchestrator just for read-only CRUD routes.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<Store>,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}
