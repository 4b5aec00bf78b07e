/// Typed error kinds propagated across the memory subsystem. Each crate
/// maps its own failures into these variants at the boundary; nothing
/// lower in the stack should need to stringly-match on error text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("content must not be empty")]
    EmptyContent,

    #[error("invalid {field} value: {value}")]
    InvalidVariant { field: &'static str, value: String },

    #[error("embedding dimension mismatch: partition expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding provider unavailable: {0}")]
    EmbeddingFailed(String),

    #[error("store is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("llm request timed out after {0:?}")]
    LlmTimeout(std::time::Duration),

    #[error("llm provider unavailable: {0}")]
    LlmUnavailable(String),

    #[error("llm returned malformed structured output: {0}")]
    LlmMalformedOutput(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("configuration invalid: {0}")]
    ConfigInvalid(String),

    #[error("authentication missing")]
    AuthMissing,

    #[error("authentication invalid")]
    AuthInvalid,
}
