//! Collaboration lifecycle command handlers.

use std::sync::Arc;

use serde_json::Value;

use verso_collab::lifecycle::{self, JoinMode, JoinRequest};
use verso_collab::{catalog, listing};

use crate::commands::{collab_error, now, require_i64, to_json};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Join (or rejoin) a collaboration instantiated from a template.
pub async fn join_collab(state: &Arc<DaemonState>, params: &Value) -> Result {
    let actor_id = require_i64(params, "actor_id")?;
    let template_id = require_i64(params, "template_id")?;
    let mode = params
        .get("mode")
        .and_then(|v| v.as_str())
        .unwrap_or("community");
    let mode = JoinMode::parse(mode)
        .ok_or_else(|| RpcError::invalid_params("mode must be community, local, or private"))?;
    let invitees: Vec<i64> = params
        .get("invitees")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect())
        .unwrap_or_default();

    let request = JoinRequest {
        template_id,
        mode,
        invitees,
    };

    let db = state.db.lock().await;
    let outcome = lifecycle::join(
        &db,
        actor_id,
        &request,
        &state.config.collabs.default_location,
        now(),
    )
    .map_err(collab_error)?;

    to_json(&outcome)
}

/// Leave a collaboration.
pub async fn leave_collab(state: &Arc<DaemonState>, params: &Value) -> Result {
    let actor_id = require_i64(params, "actor_id")?;
    let collab_id = require_i64(params, "collab_id")?;

    let db = state.db.lock().await;
    lifecycle::leave(&db, actor_id, collab_id).map_err(collab_error)?;

    Ok(serde_json::json!({"left": true}))
}

/// The caller's active collaborations, bucketed by participation mode.
pub async fn get_my_collabs(state: &Arc<DaemonState>, params: &Value) -> Result {
    let actor_id = require_i64(params, "actor_id")?;

    let db = state.db.lock().await;
    let groups = listing::list_memberships(&db, actor_id).map_err(collab_error)?;

    to_json(&groups)
}

/// Templates the caller may instantiate right now, grouped by kind.
pub async fn get_available_templates(state: &Arc<DaemonState>, params: &Value) -> Result {
    let actor_id = require_i64(params, "actor_id")?;

    let db = state.db.lock().await;
    let groups = catalog::available_templates(&db, actor_id).map_err(collab_error)?;

    to_json(&groups)
}
