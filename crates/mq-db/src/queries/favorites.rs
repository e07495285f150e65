//! Favorite operations.

use chrono::Utc;
use mq_core::{Error, MovieId, Result};
use rusqlite::Connection;

use crate::models::Favorite;

fn sql_id(movie_id: MovieId) -> Result<i64> {
    i64::try_from(movie_id.get()).map_err(|_| Error::invalid_id())
}

/// Add a movie to the favorites. No-op if already present.
pub fn add_favorite(conn: &Connection, movie_id: MovieId) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR IGNORE INTO favorites (movie_id, created_at) VALUES (?1, ?2)",
        rusqlite::params![sql_id(movie_id)?, &now],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// Remove a movie from the favorites. Returns true if a row was removed.
pub fn remove_favorite(conn: &Connection, movie_id: MovieId) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM favorites WHERE movie_id = ?1",
            rusqlite::params![sql_id(movie_id)?],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// List all favorites in insertion order.
pub fn list_favorites(conn: &Connection) -> Result<Vec<Favorite>> {
    let mut stmt = conn
        .prepare("SELECT movie_id, created_at FROM favorites ORDER BY seq")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Favorite::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    fn id(raw: u64) -> MovieId {
        MovieId::new(raw).unwrap()
    }

    #[test]
    fn add_and_remove() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        add_favorite(&conn, id(42)).unwrap();
        // Duplicate add is a no-op.
        add_favorite(&conn, id(42)).unwrap();
        assert_eq!(list_favorites(&conn).unwrap().len(), 1);

        assert!(remove_favorite(&conn, id(42)).unwrap());
        assert!(!remove_favorite(&conn, id(42)).unwrap());
        assert!(list_favorites(&conn).unwrap().is_empty());
    }

    #[test]
    fn list_keeps_insertion_order() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        for raw in [30, 10, 20] {
            add_favorite(&conn, id(raw)).unwrap();
        }
        let ids: Vec<u64> = list_favorites(&conn)
            .unwrap()
            .into_iter()
            .map(|f| f.movie_id.get())
            .collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }
}
