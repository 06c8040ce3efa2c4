//! Membership ledger query functions.
//!
//! Rows are append-only: a rejoin appends a fresh row rather than reviving
//! an old one, and leave removes the active row outright. History for a
//! `(profile, collab)` pair can therefore hold multiple rows over time.

use rusqlite::Connection;
use verso_types::collab::{MemberRole, MemberStatus, ParticipationMode};

use crate::Result;

/// Append a membership row, returning its id.
pub fn insert(
    conn: &Connection,
    profile_id: i64,
    collab_id: i64,
    role: MemberRole,
    status: MemberStatus,
    mode: &ParticipationMode,
    joined_at: u64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO memberships (profile_id, collab_id, role, status, participation_mode,
                                  location, joined_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            profile_id,
            collab_id,
            role.as_str(),
            status.as_str(),
            mode.as_str(),
            mode.location(),
            joined_at as i64,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The profile's active membership in a collaboration, if any.
pub fn active_for(conn: &Connection, profile_id: i64, collab_id: i64) -> Result<Option<MembershipRow>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} FROM memberships
         WHERE profile_id = ?1 AND collab_id = ?2 AND status = 'active'
         ORDER BY id LIMIT 1"
    ))?;

    let mut rows = stmt
        .query_map(rusqlite::params![profile_id, collab_id], row_mapper)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(if rows.is_empty() {
        None
    } else {
        Some(rows.remove(0))
    })
}

/// Whether any membership row (of any status) exists for the pair.
pub fn any_exists(conn: &Connection, profile_id: i64, collab_id: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM memberships WHERE profile_id = ?1 AND collab_id = ?2",
        rusqlite::params![profile_id, collab_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// All active memberships held by a profile, oldest first.
pub fn active_for_profile(conn: &Connection, profile_id: i64) -> Result<Vec<MembershipRow>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} FROM memberships
         WHERE profile_id = ?1 AND status = 'active'
         ORDER BY id"
    ))?;

    let rows = stmt
        .query_map([profile_id], row_mapper)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Collab ids the profile is actively participating in.
pub fn active_collab_ids(conn: &Connection, profile_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT collab_id FROM memberships
         WHERE profile_id = ?1 AND status = 'active'",
    )?;

    let rows = stmt
        .query_map([profile_id], |row| row.get::<_, i64>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Active participant counts for a set of collaborations.
///
/// One grouped query, not a count per collab. Collabs with no active
/// members are simply absent from the result.
pub fn active_counts(conn: &Connection, collab_ids: &[i64]) -> Result<Vec<(i64, u32)>> {
    if collab_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; collab_ids.len()].join(",");
    let mut stmt = conn.prepare(&format!(
        "SELECT collab_id, COUNT(*) FROM memberships
         WHERE collab_id IN ({placeholders}) AND status = 'active'
         GROUP BY collab_id"
    ))?;

    let rows = stmt
        .query_map(rusqlite::params_from_iter(collab_ids.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)? as u32))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Hard-delete a membership row.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM memberships WHERE id = ?1", [id])?;
    Ok(())
}

const SELECT_COLUMNS: &str = "SELECT id, profile_id, collab_id, role, status, participation_mode,
     location, joined_at";

fn row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<MembershipRow> {
    Ok(MembershipRow {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        collab_id: row.get(2)?,
        role: row.get(3)?,
        status: row.get(4)?,
        participation_mode: row.get(5)?,
        location: row.get(6)?,
        joined_at: row.get::<_, i64>(7)? as u64,
    })
}

/// A raw membership row from the database.
#[derive(Debug, Clone)]
pub struct MembershipRow {
    pub id: i64,
    pub profile_id: i64,
    pub collab_id: i64,
    pub role: String,
    pub status: String,
    pub participation_mode: String,
    pub location: Option<String>,
    pub joined_at: u64,
}
