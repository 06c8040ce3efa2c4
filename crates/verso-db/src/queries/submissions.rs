//! Submission query functions.

use rusqlite::Connection;

use crate::Result;

/// Insert a submission, returning its id.
pub fn insert(
    conn: &Connection,
    period_id: i64,
    creator_id: i64,
    title: &str,
    tags: Option<&str>,
    status: &str,
    submitted_at: u64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO submissions (period_id, creator_id, title, tags, status, submitted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![period_id, creator_id, title, tags, status, submitted_at as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Published submissions for a period, ordered by creator then id.
pub fn published_for_period(conn: &Connection, period_id: i64) -> Result<Vec<SubmissionRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, period_id, creator_id, title, tags, status, submitted_at
         FROM submissions
         WHERE period_id = ?1 AND status = 'published'
         ORDER BY creator_id, id",
    )?;

    let rows = stmt
        .query_map([period_id], |row| {
            Ok(SubmissionRow {
                id: row.get(0)?,
                period_id: row.get(1)?,
                creator_id: row.get(2)?,
                title: row.get(3)?,
                tags: row.get(4)?,
                status: row.get(5)?,
                submitted_at: row.get::<_, i64>(6)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// A raw submission row from the database.
#[derive(Debug, Clone)]
pub struct SubmissionRow {
    pub id: i64,
    pub period_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub tags: Option<String>,
    pub status: String,
    pub submitted_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{periods, profiles};

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_published_filter_and_order() {
        let conn = test_db();
        let period = periods::insert(&conn, "Spring 2025", "spring", 2025, 0, 100, true)
            .expect("period");
        let ada = profiles::insert(&conn, "Ada", None, true).expect("profile");
        let grace = profiles::insert(&conn, "Grace", None, true).expect("profile");

        insert(&conn, period, grace, "Zine B", None, "published", 10).expect("insert");
        insert(&conn, period, ada, "Zine A", Some("print,collage"), "published", 20)
            .expect("insert");
        insert(&conn, period, ada, "Draft", None, "draft", 30).expect("insert");

        let rows = published_for_period(&conn, period).expect("query");
        assert_eq!(rows.len(), 2);
        // Ordered by creator id first.
        assert_eq!(rows[0].creator_id, ada);
        assert_eq!(rows[1].creator_id, grace);
    }
}
