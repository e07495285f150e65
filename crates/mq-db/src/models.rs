//! Row types returned by queries.

use mq_core::{Error, MovieId};

/// A favorited movie.
#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub movie_id: MovieId,
    pub created_at: String,
}

impl Favorite {
    /// Map a `movie_id, created_at` row.
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let raw: i64 = row.get(0)?;
        let movie_id = u64::try_from(raw)
            .ok()
            .and_then(MovieId::new)
            .ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Integer,
                    Box::new(Error::invalid_id()),
                )
            })?;
        Ok(Self {
            movie_id,
            created_at: row.get(1)?,
        })
    }
}
