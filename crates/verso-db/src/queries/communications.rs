//! Communication query functions.

use rusqlite::Connection;

use crate::Result;

/// Insert a submitted communication, returning its id.
pub fn insert(
    conn: &Connection,
    period_id: i64,
    sender_id: i64,
    recipient_id: i64,
    subject: &str,
    body: Option<&str>,
    sent_at: u64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO communications (period_id, sender_id, recipient_id, subject, body,
                                     status, sent_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 'submitted', ?6)",
        rusqlite::params![period_id, sender_id, recipient_id, subject, body, sent_at as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Submitted communications addressed to a recipient for a period.
pub fn submitted_for_recipient(
    conn: &Connection,
    recipient_id: i64,
    period_id: i64,
) -> Result<Vec<CommunicationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, period_id, sender_id, recipient_id, subject, body, status, sent_at
         FROM communications
         WHERE recipient_id = ?1 AND period_id = ?2 AND status = 'submitted'
         ORDER BY sent_at, id",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![recipient_id, period_id], |row| {
            Ok(CommunicationRow {
                id: row.get(0)?,
                period_id: row.get(1)?,
                sender_id: row.get(2)?,
                recipient_id: row.get(3)?,
                subject: row.get(4)?,
                body: row.get(5)?,
                status: row.get(6)?,
                sent_at: row.get::<_, i64>(7)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// A raw communication row from the database.
#[derive(Debug, Clone)]
pub struct CommunicationRow {
    pub id: i64,
    pub period_id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub subject: String,
    pub body: Option<String>,
    pub status: String,
    pub sent_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{periods, profiles};

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_recipient_scoping() {
        let conn = test_db();
        let period = periods::insert(&conn, "Spring 2025", "spring", 2025, 0, 100, true)
            .expect("period");
        let sender = profiles::insert(&conn, "Ada", None, true).expect("profile");
        let curator = profiles::insert(&conn, "Grace", None, true).expect("profile");
        let other = profiles::insert(&conn, "Edith", None, true).expect("profile");

        insert(&conn, period, sender, curator, "Hello", Some("note"), 10).expect("insert");
        insert(&conn, period, sender, other, "Elsewhere", None, 20).expect("insert");

        let rows = submitted_for_recipient(&conn, curator, period).expect("query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, "Hello");
        assert_eq!(rows[0].sender_id, sender);
    }
}
