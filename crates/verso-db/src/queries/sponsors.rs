//! Sponsor campaign query functions.

use rusqlite::Connection;

use crate::Result;

/// Insert a sponsor campaign, returning its id.
pub fn insert(
    conn: &Connection,
    period_id: i64,
    name: &str,
    blurb: Option<&str>,
    is_active: bool,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO sponsors (period_id, name, blurb, is_active)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![period_id, name, blurb, is_active],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Active sponsor campaigns for a period.
pub fn active_for_period(conn: &Connection, period_id: i64) -> Result<Vec<SponsorRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, period_id, name, blurb, is_active
         FROM sponsors
         WHERE period_id = ?1 AND is_active = 1
         ORDER BY name",
    )?;

    let rows = stmt
        .query_map([period_id], |row| {
            Ok(SponsorRow {
                id: row.get(0)?,
                period_id: row.get(1)?,
                name: row.get(2)?,
                blurb: row.get(3)?,
                is_active: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// A raw sponsor row from the database.
#[derive(Debug, Clone)]
pub struct SponsorRow {
    pub id: i64,
    pub period_id: i64,
    pub name: String,
    pub blurb: Option<String>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::periods;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_active_filter() {
        let conn = test_db();
        let period = periods::insert(&conn, "Spring 2025", "spring", 2025, 0, 100, true)
            .expect("period");
        insert(&conn, period, "Ink & Paper Co", Some("local print shop"), true).expect("insert");
        insert(&conn, period, "Lapsed Sponsor", None, false).expect("insert");

        let rows = active_for_period(&conn, period).expect("query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ink & Paper Co");
    }
}
