//! Curation command handlers.
//!
//! Period-scoped commands resolve the current period themselves so clients
//! never have to track which period is live.

use std::sync::Arc;

use serde_json::Value;

use verso_curation::{aggregate, selection};
use verso_db::queries::periods;
use verso_db::DbError;
use verso_types::curation::{RandomPool, SelectionSet};
use verso_types::period::{Period, Season};

use crate::commands::{curation_error, now, require_i64, require_str, to_json};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// The single current period.
pub async fn get_current_period(state: &Arc<DaemonState>) -> Result {
    let db = state.db.lock().await;
    let row = current_period(&db)?;

    let season = Season::parse(&row.season)
        .ok_or_else(|| RpcError::internal_error(&format!("unknown season {:?}", row.season)))?;

    to_json(&Period {
        id: row.id,
        name: row.name,
        season,
        year: row.year,
        start_date: row.start_date,
        end_date: row.end_date,
        is_active: row.is_active,
    })
}

/// Everything a curator can select from, plus their prior selections.
pub async fn get_curation_bundle(state: &Arc<DaemonState>, params: &Value) -> Result {
    let curator_id = require_i64(params, "curator_id")?;

    let db = state.db.lock().await;
    let period = current_period(&db)?;
    let bundle = aggregate::curation_bundle(&db, curator_id, period.id);

    to_json(&bundle)
}

/// Replace the curator's selections for the current period.
pub async fn save_selections(state: &Arc<DaemonState>, params: &Value) -> Result {
    let curator_id = require_i64(params, "curator_id")?;
    // Selection fields ride flat in the params object; absent ones default
    // to empty.
    let set: SelectionSet = serde_json::from_value(params.clone())
        .map_err(|e| RpcError::invalid_params(&format!("selections: {e}")))?;

    let db = state.db.lock().await;
    let period = current_period(&db)?;
    let outcome = selection::save_selections(&db, curator_id, period.id, &set, now())
        .map_err(curation_error)?;

    to_json(&outcome)
}

/// Draw a random sample of eligible ids for the curator.
pub async fn random_selection(state: &Arc<DaemonState>, params: &Value) -> Result {
    let curator_id = require_i64(params, "curator_id")?;
    let pool = match require_str(params, "pool")? {
        "collabs" => RandomPool::Collabs,
        "communications" => RandomPool::Communications,
        _ => return Err(RpcError::invalid_params("pool must be collabs or communications")),
    };
    let cap = params
        .get("cap")
        .and_then(|v| v.as_u64())
        .map(|c| c as usize)
        .unwrap_or(state.config.curation.random_selection_cap);

    let db = state.db.lock().await;
    let period = current_period(&db)?;
    let ids = selection::random_selection(&db, curator_id, period.id, pool, cap)
        .map_err(curation_error)?;

    Ok(serde_json::json!({"ids": ids}))
}

/// Send a communication to a curator for the current period.
pub async fn send_communication(state: &Arc<DaemonState>, params: &Value) -> Result {
    let sender_id = require_i64(params, "sender_id")?;
    let recipient_id = require_i64(params, "recipient_id")?;
    let subject = require_str(params, "subject")?;
    let body = params.get("body").and_then(|v| v.as_str());

    let db = state.db.lock().await;
    let period = current_period(&db)?;
    let id = selection::send_communication(
        &db,
        sender_id,
        recipient_id,
        period.id,
        subject,
        body,
        now(),
    )
    .map_err(curation_error)?;

    Ok(serde_json::json!({"communication_id": id}))
}

fn current_period(db: &rusqlite::Connection) -> std::result::Result<periods::PeriodRow, RpcError> {
    periods::current(db).map_err(|e| match e {
        DbError::NotFound(_) => RpcError::no_active_period(),
        other => RpcError::internal_error(&format!("db error: {other}")),
    })
}
