//! Profile query functions.
//!
//! Profiles are owned by the identity/profile subsystem; this layer reads
//! the fields the engines need (city for local-mode location resolution,
//! the communications consent flag) and inserts rows for tests.

use rusqlite::Connection;

use crate::{DbError, Result};

/// Insert a profile.
pub fn insert(
    conn: &Connection,
    display_name: &str,
    city: Option<&str>,
    accepts_communications: bool,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO profiles (display_name, city, accepts_communications)
         VALUES (?1, ?2, ?3)",
        rusqlite::params![display_name, city, accepts_communications],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a profile by id.
pub fn get(conn: &Connection, id: i64) -> Result<ProfileRow> {
    conn.query_row(
        "SELECT id, display_name, city, accepts_communications
         FROM profiles WHERE id = ?1",
        [id],
        |row| {
            Ok(ProfileRow {
                id: row.get(0)?,
                display_name: row.get(1)?,
                city: row.get(2)?,
                accepts_communications: row.get(3)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("profile {id}")),
        other => DbError::Sqlite(other),
    })
}

/// Get a profile's city, if the profile exists and has one set.
pub fn city(conn: &Connection, id: i64) -> Result<Option<String>> {
    match get(conn, id) {
        Ok(profile) => Ok(profile.city.filter(|c| !c.trim().is_empty())),
        Err(DbError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// A raw profile row from the database.
#[derive(Debug, Clone)]
pub struct ProfileRow {
    pub id: i64,
    pub display_name: String,
    pub city: Option<String>,
    pub accepts_communications: bool,
}
