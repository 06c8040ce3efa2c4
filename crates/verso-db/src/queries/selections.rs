//! Curator selection query functions.
//!
//! Replace semantics per category: delete all rows for the
//! `(curator, period)` pair, then insert the new set. The delete always
//! stands; a failed insert batch is rolled back to the post-delete state,
//! leaving the category empty rather than restoring its prior value. The
//! caller surfaces that as a partial failure.

use rusqlite::Connection;

use crate::Result;

const CREATOR_TABLE: &str = "creator_selections";
const SPONSOR_TABLE: &str = "sponsor_selections";
const COLLAB_TABLE: &str = "collab_selections";

/// Replace the curator's creator selections for a period.
pub fn replace_creators(
    conn: &Connection,
    curator_id: i64,
    period_id: i64,
    target_ids: &[i64],
    selected_at: u64,
) -> Result<()> {
    replace_in(conn, CREATOR_TABLE, curator_id, period_id, target_ids, selected_at)
}

/// Replace the curator's sponsor selections for a period.
pub fn replace_sponsors(
    conn: &Connection,
    curator_id: i64,
    period_id: i64,
    target_ids: &[i64],
    selected_at: u64,
) -> Result<()> {
    replace_in(conn, SPONSOR_TABLE, curator_id, period_id, target_ids, selected_at)
}

/// Replace the curator's collaboration selections for a period.
pub fn replace_collabs(
    conn: &Connection,
    curator_id: i64,
    period_id: i64,
    target_ids: &[i64],
    selected_at: u64,
) -> Result<()> {
    replace_in(conn, COLLAB_TABLE, curator_id, period_id, target_ids, selected_at)
}

/// Persisted creator selections for a `(curator, period)` pair.
pub fn creators(conn: &Connection, curator_id: i64, period_id: i64) -> Result<Vec<i64>> {
    ids_in(conn, CREATOR_TABLE, curator_id, period_id)
}

/// Persisted sponsor selections for a `(curator, period)` pair.
pub fn sponsors(conn: &Connection, curator_id: i64, period_id: i64) -> Result<Vec<i64>> {
    ids_in(conn, SPONSOR_TABLE, curator_id, period_id)
}

/// Persisted collaboration selections for a `(curator, period)` pair.
pub fn collabs(conn: &Connection, curator_id: i64, period_id: i64) -> Result<Vec<i64>> {
    ids_in(conn, COLLAB_TABLE, curator_id, period_id)
}

/// Set the curator's communications opt-in flag for a period.
pub fn set_include_communications(
    conn: &Connection,
    curator_id: i64,
    period_id: i64,
    include: bool,
) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO communication_prefs (curator_id, period_id, include_communications)
         VALUES (?1, ?2, ?3)",
        rusqlite::params![curator_id, period_id, include],
    )?;
    Ok(())
}

/// The curator's communications opt-in flag for a period. Defaults to false.
pub fn include_communications(conn: &Connection, curator_id: i64, period_id: i64) -> Result<bool> {
    let mut stmt = conn.prepare(
        "SELECT include_communications FROM communication_prefs
         WHERE curator_id = ?1 AND period_id = ?2",
    )?;
    let mut rows = stmt
        .query_map(rusqlite::params![curator_id, period_id], |row| {
            row.get::<_, bool>(0)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows.pop().unwrap_or(false))
}

fn replace_in(
    conn: &Connection,
    table: &'static str,
    curator_id: i64,
    period_id: i64,
    target_ids: &[i64],
    selected_at: u64,
) -> Result<()> {
    conn.execute(
        &format!("DELETE FROM {table} WHERE curator_id = ?1 AND period_id = ?2"),
        rusqlite::params![curator_id, period_id],
    )?;

    // Inserts under a savepoint: a failure rolls back to the post-delete
    // state so the category is empty, never half-written.
    conn.execute_batch("SAVEPOINT selection_insert;")?;
    let inserted = insert_ids(conn, table, curator_id, period_id, target_ids, selected_at);
    match inserted {
        Ok(()) => {
            conn.execute_batch("RELEASE selection_insert;")?;
            Ok(())
        }
        Err(e) => {
            if let Err(rollback) =
                conn.execute_batch("ROLLBACK TO selection_insert; RELEASE selection_insert;")
            {
                tracing::error!(table, error = %rollback, "selection insert rollback failed");
            }
            Err(e)
        }
    }
}

fn insert_ids(
    conn: &Connection,
    table: &'static str,
    curator_id: i64,
    period_id: i64,
    target_ids: &[i64],
    selected_at: u64,
) -> Result<()> {
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {table} (curator_id, period_id, target_id, selected_at)
         VALUES (?1, ?2, ?3, ?4)"
    ))?;
    for target_id in target_ids {
        stmt.execute(rusqlite::params![curator_id, period_id, target_id, selected_at as i64])?;
    }
    Ok(())
}

fn ids_in(conn: &Connection, table: &'static str, curator_id: i64, period_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT target_id FROM {table}
         WHERE curator_id = ?1 AND period_id = ?2
         ORDER BY target_id"
    ))?;

    let rows = stmt
        .query_map(rusqlite::params![curator_id, period_id], |row| {
            row.get::<_, i64>(0)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{periods, profiles};

    fn test_db() -> (Connection, i64, i64) {
        let conn = crate::open_memory().expect("open test db");
        let curator = profiles::insert(&conn, "Grace", None, true).expect("profile");
        let period = periods::insert(&conn, "Spring 2025", "spring", 2025, 0, 100, true)
            .expect("period");
        (conn, curator, period)
    }

    #[test]
    fn test_replace_is_replace_not_union() {
        let (conn, curator, period) = test_db();

        replace_creators(&conn, curator, period, &[1, 2], 100).expect("first save");
        replace_creators(&conn, curator, period, &[1], 200).expect("second save");

        assert_eq!(creators(&conn, curator, period).expect("query"), vec![1]);
    }

    #[test]
    fn test_replace_empty_clears() {
        let (conn, curator, period) = test_db();

        replace_sponsors(&conn, curator, period, &[5, 6], 100).expect("save");
        replace_sponsors(&conn, curator, period, &[], 200).expect("clear");

        assert!(sponsors(&conn, curator, period).expect("query").is_empty());
    }

    #[test]
    fn test_failed_insert_leaves_category_empty() {
        let (conn, curator, period) = test_db();

        replace_collabs(&conn, curator, period, &[7], 100).expect("save");
        // Duplicate target ids violate the primary key mid-batch.
        let result = replace_collabs(&conn, curator, period, &[8, 8], 200);
        assert!(result.is_err());

        // Prior value is not restored; the delete stands.
        assert!(collabs(&conn, curator, period).expect("query").is_empty());
    }

    #[test]
    fn test_categories_independent() {
        let (conn, curator, period) = test_db();

        replace_creators(&conn, curator, period, &[1], 100).expect("creators");
        replace_sponsors(&conn, curator, period, &[2], 100).expect("sponsors");
        replace_collabs(&conn, curator, period, &[3], 100).expect("collabs");

        assert_eq!(creators(&conn, curator, period).expect("query"), vec![1]);
        assert_eq!(sponsors(&conn, curator, period).expect("query"), vec![2]);
        assert_eq!(collabs(&conn, curator, period).expect("query"), vec![3]);
    }

    #[test]
    fn test_communications_flag_defaults_false() {
        let (conn, curator, period) = test_db();
        assert!(!include_communications(&conn, curator, period).expect("query"));

        set_include_communications(&conn, curator, period, true).expect("set");
        assert!(include_communications(&conn, curator, period).expect("query"));

        set_include_communications(&conn, curator, period, false).expect("unset");
        assert!(!include_communications(&conn, curator, period).expect("query"));
    }

    #[test]
    fn test_scoped_per_curator_and_period() {
        let (conn, curator, period) = test_db();
        let other_curator = profiles::insert(&conn, "Edith", None, true).expect("profile");
        let other_period = periods::insert(&conn, "Summer 2025", "summer", 2025, 200, 300, false)
            .expect("period");

        replace_creators(&conn, curator, period, &[1], 100).expect("save");
        replace_creators(&conn, other_curator, period, &[2], 100).expect("save");
        replace_creators(&conn, curator, other_period, &[3], 100).expect("save");

        assert_eq!(creators(&conn, curator, period).expect("query"), vec![1]);
        assert_eq!(creators(&conn, other_curator, period).expect("query"), vec![2]);
        assert_eq!(creators(&conn, curator, other_period).expect("query"), vec![3]);
    }
}
