//! Template and period-binding query functions.

use rusqlite::Connection;

use crate::{DbError, Result};

/// Insert a template. Used by admin tooling and tests.
pub fn insert(
    conn: &Connection,
    name: &str,
    display_text: Option<&str>,
    kind: Option<&str>,
    phases: Option<u32>,
    duration: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO templates (name, display_text, kind, phases, duration)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![name, display_text, kind, phases, duration],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Set the free-text guidance fields on a template.
pub fn set_guidance(
    conn: &Connection,
    template_id: i64,
    requirements: Option<&str>,
    connection_rules: Option<&str>,
    internal_reference: Option<&str>,
) -> Result<()> {
    conn.execute(
        "UPDATE templates SET requirements = ?2, connection_rules = ?3, internal_reference = ?4
         WHERE id = ?1",
        rusqlite::params![template_id, requirements, connection_rules, internal_reference],
    )?;
    Ok(())
}

/// Get a template by id.
pub fn get(conn: &Connection, id: i64) -> Result<TemplateRow> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} FROM templates t WHERE t.id = ?1"),
        [id],
        row_mapper,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("template {id}")),
        other => DbError::Sqlite(other),
    })
}

/// Bind a template to a period. Idempotent.
pub fn bind_to_period(conn: &Connection, period_id: i64, template_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO period_templates (period_id, template_id) VALUES (?1, ?2)",
        rusqlite::params![period_id, template_id],
    )?;
    Ok(())
}

/// List the templates bound to a period.
pub fn bound_to_period(conn: &Connection, period_id: i64) -> Result<Vec<TemplateRow>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} FROM templates t
         JOIN period_templates pt ON pt.template_id = t.id
         WHERE pt.period_id = ?1
         ORDER BY t.name"
    ))?;

    let rows = stmt
        .query_map([period_id], row_mapper)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

const SELECT_COLUMNS: &str = "SELECT t.id, t.name, t.display_text, t.kind, t.phases, t.duration,
     t.requirements, t.connection_rules, t.internal_reference";

fn row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<TemplateRow> {
    Ok(TemplateRow {
        id: row.get(0)?,
        name: row.get(1)?,
        display_text: row.get(2)?,
        kind: row.get(3)?,
        phases: row.get::<_, Option<i64>>(4)?.map(|p| p as u32),
        duration: row.get(5)?,
        requirements: row.get(6)?,
        connection_rules: row.get(7)?,
        internal_reference: row.get(8)?,
    })
}

/// A raw template row from the database.
#[derive(Debug, Clone)]
pub struct TemplateRow {
    pub id: i64,
    pub name: String,
    pub display_text: Option<String>,
    pub kind: Option<String>,
    pub phases: Option<u32>,
    pub duration: Option<String>,
    pub requirements: Option<String>,
    pub connection_rules: Option<String>,
    pub internal_reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::periods;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_insert_and_get() {
        let conn = test_db();
        let id = insert(&conn, "Urban Chains", Some("Pass it on"), Some("chain"), Some(5), None)
            .expect("insert");
        let template = get(&conn, id).expect("get");
        assert_eq!(template.name, "Urban Chains");
        assert_eq!(template.kind.as_deref(), Some("chain"));
        assert_eq!(template.phases, Some(5));
    }

    #[test]
    fn test_get_missing() {
        let conn = test_db();
        assert!(matches!(get(&conn, 7), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_bound_to_period() {
        let conn = test_db();
        let period = periods::insert(&conn, "Spring 2025", "spring", 2025, 0, 100, true)
            .expect("period");
        let t1 = insert(&conn, "Urban Chains", None, Some("chain"), None, None).expect("t1");
        let t2 = insert(&conn, "Story Relay", None, None, None, None).expect("t2");
        // t2 deliberately left unbound
        let _ = t2;
        bind_to_period(&conn, period, t1).expect("bind");
        bind_to_period(&conn, period, t1).expect("bind twice is idempotent");

        let bound = bound_to_period(&conn, period).expect("bound");
        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0].id, t1);
    }

    #[test]
    fn test_guidance_fields() {
        let conn = test_db();
        let id = insert(&conn, "Urban Chains", None, Some("chain"), None, None).expect("insert");
        set_guidance(&conn, id, Some("bring a camera"), Some("link to previous"), Some("UC-01"))
            .expect("guidance");
        let template = get(&conn, id).expect("get");
        assert_eq!(template.requirements.as_deref(), Some("bring a camera"));
        assert_eq!(template.internal_reference.as_deref(), Some("UC-01"));
    }
}
