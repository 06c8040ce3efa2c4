//! RPC command handlers.

pub mod collabs;
pub mod curation;

use serde_json::Value;

use crate::rpc::RpcError;

/// Current Unix timestamp in seconds.
pub(crate) fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Extract a required integer parameter.
pub(crate) fn require_i64(params: &Value, key: &str) -> Result<i64, RpcError> {
    params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// Extract a required string parameter.
pub(crate) fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, RpcError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// Serialize a handler result to JSON.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| RpcError::internal_error(&format!("serialization error: {e}")))
}

/// Map a collaboration engine error to its RPC error.
pub(crate) fn collab_error(err: verso_collab::CollabError) -> RpcError {
    use verso_collab::CollabError;
    match err {
        CollabError::TemplateNotFound(id) => RpcError::template_not_found(id),
        CollabError::NotAParticipant {
            profile_id,
            collab_id,
        } => RpcError::not_a_participant(profile_id, collab_id),
        CollabError::Db(e) => RpcError::internal_error(&format!("db error: {e}")),
    }
}

/// Map a curation engine error to its RPC error.
pub(crate) fn curation_error(err: verso_curation::CurationError) -> RpcError {
    use verso_curation::CurationError;
    match err {
        CurationError::Validation(detail) => RpcError::validation_error(&detail),
        CurationError::PermissionDenied(detail) => RpcError::permission_denied(&detail),
        CurationError::Db(e) => RpcError::internal_error(&format!("db error: {e}")),
    }
}
