//! Collaboration instance query functions.
//!
//! One row per instantiated project. `is_private` is computed here from the
//! participation mode; callers cannot supply a disagreeing flag.

use rusqlite::Connection;
use verso_types::collab::ParticipationMode;

use crate::{DbError, Result};

/// Fields for a new collaboration row.
#[derive(Debug, Clone)]
pub struct NewCollab<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub kind: &'a str,
    pub created_by: i64,
    pub total_phases: Option<u32>,
    pub template_id: Option<i64>,
    pub mode: &'a ParticipationMode,
    pub requirements: Option<&'a str>,
    pub connection_rules: Option<&'a str>,
    pub internal_reference: Option<&'a str>,
    pub created_at: u64,
}

/// Insert a new collaboration, returning its id.
///
/// New collaborations always start at phase 1.
pub fn insert(conn: &Connection, collab: &NewCollab<'_>) -> Result<i64> {
    conn.execute(
        "INSERT INTO collabs (title, description, kind, is_private, created_by, current_phase,
                              total_phases, template_id, participation_mode, location,
                              requirements, connection_rules, internal_reference, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            collab.title,
            collab.description,
            collab.kind,
            collab.mode.is_private(),
            collab.created_by,
            collab.total_phases,
            collab.template_id,
            collab.mode.as_str(),
            collab.mode.location(),
            collab.requirements,
            collab.connection_rules,
            collab.internal_reference,
            collab.created_at as i64,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a collaboration by id.
pub fn get(conn: &Connection, id: i64) -> Result<CollabRow> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} FROM collabs WHERE id = ?1"),
        [id],
        row_mapper,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("collab {id}")),
        other => DbError::Sqlite(other),
    })
}

/// Collaborations a creator instantiated from a given template, oldest first.
///
/// Drives the idempotent-rejoin check: a second join of the same template
/// reuses the earliest prior instance instead of creating a duplicate.
pub fn by_creator_and_template(
    conn: &Connection,
    created_by: i64,
    template_id: i64,
) -> Result<Vec<CollabRow>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} FROM collabs
         WHERE created_by = ?1 AND template_id = ?2
         ORDER BY id"
    ))?;

    let rows = stmt
        .query_map(rusqlite::params![created_by, template_id], row_mapper)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Community and local collaborations belonging to a period.
///
/// A collaboration belongs to a period through its template's period
/// binding. Private collaborations are never listed.
pub fn open_for_period(conn: &Connection, period_id: i64) -> Result<Vec<CollabRow>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} FROM collabs
         WHERE is_private = 0
           AND template_id IN (SELECT template_id FROM period_templates WHERE period_id = ?1)
         ORDER BY id"
    ))?;

    let rows = stmt
        .query_map([period_id], row_mapper)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Distinct template ids for a set of collaborations.
pub fn template_ids(conn: &Connection, collab_ids: &[i64]) -> Result<Vec<i64>> {
    if collab_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; collab_ids.len()].join(",");
    let mut stmt = conn.prepare(&format!(
        "SELECT DISTINCT template_id FROM collabs
         WHERE id IN ({placeholders}) AND template_id IS NOT NULL"
    ))?;

    let rows = stmt
        .query_map(rusqlite::params_from_iter(collab_ids.iter()), |row| {
            row.get::<_, i64>(0)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

const SELECT_COLUMNS: &str = "SELECT id, title, description, kind, is_private, created_by,
     current_phase, total_phases, template_id, participation_mode, location,
     requirements, connection_rules, internal_reference, created_at";

fn row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<CollabRow> {
    Ok(CollabRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        kind: row.get(3)?,
        is_private: row.get(4)?,
        created_by: row.get(5)?,
        current_phase: row.get::<_, i64>(6)? as u32,
        total_phases: row.get::<_, Option<i64>>(7)?.map(|p| p as u32),
        template_id: row.get(8)?,
        participation_mode: row.get(9)?,
        location: row.get(10)?,
        requirements: row.get(11)?,
        connection_rules: row.get(12)?,
        internal_reference: row.get(13)?,
        created_at: row.get::<_, i64>(14)? as u64,
    })
}

/// A raw collaboration row from the database.
#[derive(Debug, Clone)]
pub struct CollabRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub is_private: bool,
    pub created_by: i64,
    pub current_phase: u32,
    pub total_phases: Option<u32>,
    pub template_id: Option<i64>,
    pub participation_mode: String,
    pub location: Option<String>,
    pub requirements: Option<String>,
    pub connection_rules: Option<String>,
    pub internal_reference: Option<String>,
    pub created_at: u64,
}

impl CollabRow {
    /// Reassemble the typed participation mode from the stored columns.
    pub fn mode(&self) -> ParticipationMode {
        ParticipationMode::from_columns(Some(&self.participation_mode), self.location.clone())
    }
}
