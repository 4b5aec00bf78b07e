use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mnemo_core::Error;
use serde::Serialize;
use tracing::error;

/// Wire shape for every error response, carrying a typed `kind` alongside a
/// human-readable `message`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

/// Wraps [`mnemo_core::Error`] so handlers can return it directly and have
/// axum map it onto the appropriate status code and error kind.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            Error::AuthMissing => (StatusCode::UNAUTHORIZED, "auth_missing"),
            Error::AuthInvalid => (StatusCode::FORBIDDEN, "auth_invalid"),
            Error::UnknownUser(_) => (StatusCode::NOT_FOUND, "unknown_user"),
            Error::UnknownSession(_) => (StatusCode::NOT_FOUND, "unknown_session"),
            Error::InvalidRole(_) => (StatusCode::BAD_REQUEST, "invalid_role"),
            Error::LlmTimeout(_) | Error::LlmUnavailable(_) => (StatusCode::BAD_GATEWAY, "llm_unavailable"),
            Error::LlmMalformedOutput(_) => (StatusCode::BAD_GATEWAY, "llm_malformed_output"),
            Error::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
            Error::DimensionMismatch { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "dimension_mismatch"),
            Error::ConfigInvalid(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_invalid"),
            Error::EmbeddingFailed(_) => (StatusCode::SERVICE_UNAVAILABLE, "embedding_failed"),
            Error::EmptyContent | Error::InvalidVariant { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
        };

        if status.is_server_error() {
            error!("request failed: {}", self.0);
        }

        (status, Json(ErrorBody { kind, message: self.0.to_string() })).into_response()
    }
}
