use serde::{Deserialize, Serialize};

/// A `(user_id, session_id, role_id)` triple that fully partitions stored
/// memory. Fragments never cross scopes in retrieval; deleting a scope
/// deletes its fragments atomically from the store's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub user_id: String,
    pub session_id: String,
    pub role_id: String,
}

impl Scope {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        role_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            role_id: role_id.into(),
        }
    }

    /// Deterministic partition key for this scope, used as the store's
    /// `scope_key` column. Hashed (rather than the raw tuple joined with a
    /// separator) so arbitrary user-supplied ids can never collide across
    /// the separator boundary.
    #[must_use]
    pub fn partition_key(&self) -> String {
        crate::content_hash(
            "scope",
            &format!("{}\u{1f}{}\u{1f}{}", self.user_id, self.session_id, self.role_id),
        )
    }
}
