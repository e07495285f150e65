//! Application context shared across all route handlers via Axum state.

use std::sync::Arc;

use mq_core::config::{Config, FavoritesBackend};
use mq_core::Result;

use crate::catalog::Catalog;
use crate::favorites::{FavoritesStore, MemoryFavoritesStore, SqliteFavoritesStore};
use crate::provider::MovieProvider;
use crate::tmdb::TmdbClient;

/// Shared application state; cheap to clone.
#[derive(Clone)]
pub struct AppContext {
    /// Listing and by-id lookups against the movie provider.
    pub catalog: Arc<Catalog>,
    /// Favorite movie ids.
    pub favorites: Arc<dyn FavoritesStore>,
}

impl AppContext {
    pub fn new(
        config: Config,
        provider: Arc<dyn MovieProvider>,
        favorites: Arc<dyn FavoritesStore>,
    ) -> Self {
        let catalog = Catalog::new(provider, config.catalog.page_detail_limit);
        Self {
            catalog: Arc::new(catalog),
            favorites,
        }
    }

    /// Wire the TMDB client and the configured favorites backend.
    pub fn from_config(config: Config) -> Result<Self> {
        let provider: Arc<dyn MovieProvider> = Arc::new(TmdbClient::new(&config.provider));

        let favorites: Arc<dyn FavoritesStore> = match config.favorites.backend {
            FavoritesBackend::Memory => {
                tracing::info!("Favorites kept in memory; they are lost on restart");
                Arc::new(MemoryFavoritesStore::new())
            }
            FavoritesBackend::Sqlite => {
                let path = &config.favorites.db_path;
                let pool = mq_db::pool::init_pool(path)?;
                tracing::info!("Favorites database opened at {}", path.display());
                Arc::new(SqliteFavoritesStore::new(pool))
            }
        };

        Ok(Self::new(config, provider, favorites))
    }
}
