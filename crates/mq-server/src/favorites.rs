//! Favorite movie id storage.
//!
//! [`FavoritesStore`] has set semantics: adding a present id and removing an
//! absent one are both no-ops. Ids are listed in insertion order.

use mq_core::{MovieId, Result};
use mq_db::pool::{get_conn, DbPool};
use mq_db::queries::favorites;
use parking_lot::Mutex;

pub trait FavoritesStore: Send + Sync {
    fn list(&self) -> Result<Vec<MovieId>>;
    fn add(&self, id: MovieId) -> Result<()>;
    fn remove(&self, id: MovieId) -> Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-lifetime set; empty at start, gone on restart.
#[derive(Default)]
pub struct MemoryFavoritesStore {
    ids: Mutex<Vec<MovieId>>,
}

impl MemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStore for MemoryFavoritesStore {
    fn list(&self) -> Result<Vec<MovieId>> {
        Ok(self.ids.lock().clone())
    }

    fn add(&self, id: MovieId) -> Result<()> {
        let mut ids = self.ids.lock();
        if !ids.contains(&id) {
            ids.push(id);
        }
        Ok(())
    }

    fn remove(&self, id: MovieId) -> Result<()> {
        self.ids.lock().retain(|existing| *existing != id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// Favorites persisted in the `favorites` table.
pub struct SqliteFavoritesStore {
    pool: DbPool,
}

impl SqliteFavoritesStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl FavoritesStore for SqliteFavoritesStore {
    fn list(&self) -> Result<Vec<MovieId>> {
        let conn = get_conn(&self.pool)?;
        let favs = favorites::list_favorites(&conn)?;
        Ok(favs.into_iter().map(|f| f.movie_id).collect())
    }

    fn add(&self, id: MovieId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        favorites::add_favorite(&conn, id)
    }

    fn remove(&self, id: MovieId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        if !favorites::remove_favorite(&conn, id)? {
            tracing::debug!(movie_id = %id, "Favorite was not present");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> MovieId {
        MovieId::new(raw).unwrap()
    }

    fn exercise(store: &dyn FavoritesStore) {
        assert!(store.list().unwrap().is_empty());

        store.add(id(5)).unwrap();
        store.add(id(3)).unwrap();
        store.add(id(5)).unwrap();
        assert_eq!(store.list().unwrap(), vec![id(5), id(3)]);

        store.remove(id(9)).unwrap();
        assert_eq!(store.list().unwrap(), vec![id(5), id(3)]);

        store.remove(id(5)).unwrap();
        store.remove(id(5)).unwrap();
        assert_eq!(store.list().unwrap(), vec![id(3)]);

        store.add(id(5)).unwrap();
        assert_eq!(store.list().unwrap(), vec![id(3), id(5)]);
    }

    #[test]
    fn memory_store_set_semantics() {
        exercise(&MemoryFavoritesStore::new());
    }

    #[test]
    fn sqlite_store_set_semantics() {
        let pool = mq_db::pool::init_memory_pool().unwrap();
        exercise(&SqliteFavoritesStore::new(pool));
    }

    #[test]
    fn sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favs.db");

        let store = SqliteFavoritesStore::new(mq_db::pool::init_pool(&path).unwrap());
        store.add(id(11)).unwrap();
        drop(store);

        let store = SqliteFavoritesStore::new(mq_db::pool::init_pool(&path).unwrap());
        assert_eq!(store.list().unwrap(), vec![id(11)]);
    }
}
