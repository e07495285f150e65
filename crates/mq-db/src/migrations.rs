//! Favorites schema, versioned through SQLite's `user_version` pragma.

use mq_core::{Error, Result};
use rusqlite::Connection;

/// Schema version this build writes and understands.
pub const SCHEMA_VERSION: i64 = 1;

/// `seq` records insertion order; `movie_id` is unique so re-adding is a no-op.
const FAVORITES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS favorites (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id   INTEGER NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);
"#;

fn user_version(conn: &Connection) -> Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| Error::database(format!("Failed to read schema version: {e}")))
}

/// Bring a favorites database up to [`SCHEMA_VERSION`].
///
/// A fresh file gets the table and its version in one transaction. A file
/// already at the current version is left alone, and one written by a newer
/// build is refused rather than guessed at.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    let found = user_version(conn)?;
    if found == SCHEMA_VERSION {
        return Ok(());
    }
    if found > SCHEMA_VERSION {
        return Err(Error::database(format!(
            "Favorites database has schema version {found}; this build supports {SCHEMA_VERSION}"
        )));
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    tx.execute_batch(FAVORITES_TABLE)
        .map_err(|e| Error::database(format!("Failed to create favorites table: {e}")))?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|e| Error::database(e.to_string()))?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    tracing::debug!(version = SCHEMA_VERSION, "Favorites schema created");
    Ok(())
}
