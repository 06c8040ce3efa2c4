//! Period query functions.
//!
//! Periods are created and activated out-of-band by admin tooling; this
//! layer only reads them (inserts exist for tests and tooling).

use rusqlite::Connection;

use crate::{DbError, Result};

/// Insert a period. Used by admin tooling and tests.
pub fn insert(
    conn: &Connection,
    name: &str,
    season: &str,
    year: u16,
    start_date: u64,
    end_date: u64,
    is_active: bool,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO periods (name, season, year, start_date, end_date, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            name,
            season,
            year,
            start_date as i64,
            end_date as i64,
            is_active,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Resolve the single current period.
///
/// Among active-flagged rows the latest-ending one is authoritative. More
/// than one active row is a data-quality anomaly: it is logged and the
/// tie-break proceeds deterministically rather than erroring.
pub fn current(conn: &Connection) -> Result<PeriodRow> {
    let active_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM periods WHERE is_active = 1",
        [],
        |row| row.get(0),
    )?;
    if active_count > 1 {
        tracing::warn!(
            active_count,
            "multiple active periods; using latest end_date"
        );
    }

    conn.query_row(
        "SELECT id, name, season, year, start_date, end_date, is_active
         FROM periods WHERE is_active = 1
         ORDER BY end_date DESC LIMIT 1",
        [],
        row_mapper,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound("active period".into()),
        other => DbError::Sqlite(other),
    })
}

/// Get a period by id.
pub fn get(conn: &Connection, id: i64) -> Result<PeriodRow> {
    conn.query_row(
        "SELECT id, name, season, year, start_date, end_date, is_active
         FROM periods WHERE id = ?1",
        [id],
        row_mapper,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("period {id}")),
        other => DbError::Sqlite(other),
    })
}

fn row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<PeriodRow> {
    Ok(PeriodRow {
        id: row.get(0)?,
        name: row.get(1)?,
        season: row.get(2)?,
        year: row.get::<_, i64>(3)? as u16,
        start_date: row.get::<_, i64>(4)? as u64,
        end_date: row.get::<_, i64>(5)? as u64,
        is_active: row.get(6)?,
    })
}

/// A raw period row from the database.
#[derive(Debug, Clone)]
pub struct PeriodRow {
    pub id: i64,
    pub name: String,
    pub season: String,
    pub year: u16,
    pub start_date: u64,
    pub end_date: u64,
    pub is_active: bool,
}
