//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for the server, the movie provider, catalog fan-out limits,
//! and the favorites backend. Every section defaults sensibly so a completely
//! empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Environment variable holding the provider's read-access bearer token.
pub const ENV_READ_TOKEN: &str = "TMDB_API_READ_TOKEN";
/// Environment variable overriding `server.host`.
pub const ENV_HOST: &str = "MARQUEE_HOST";
/// Environment variable overriding `server.port`.
pub const ENV_PORT: &str = "MARQUEE_PORT";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub catalog: CatalogConfig,
    pub favorites: FavoritesConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load a config file strictly: read and parse errors are returned.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` as the environment.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ENV_READ_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.provider.read_token = Some(token.trim().to_string());
        }
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid {ENV_PORT} value '{port}'"),
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.provider.read_token.is_none() {
            warnings.push(format!(
                "provider.read_token is not set (or {ENV_READ_TOKEN}); provider requests will be rejected"
            ));
        }

        if self.catalog.page_detail_limit == 0 {
            warnings.push("catalog.page_detail_limit is 0; listing pages will be empty".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Optional directory holding a built UI, served as an SPA fallback.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            static_dir: None,
        }
    }
}

/// Movie metadata provider (TMDB) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Bearer credential for the provider's v4 read-access token.
    pub read_token: Option<String>,
    pub image_base_url: String,
    /// Optional ISO-639-1 language tag (e.g. `en-US`) sent with every request.
    pub language: Option<String>,
    /// Discovery listings exclude movies with fewer votes than this.
    pub min_vote_count: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".into(),
            read_token: None,
            image_base_url: "https://image.tmdb.org/t/p".into(),
            language: None,
            min_vote_count: 50,
        }
    }
}

/// Catalog aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// How many results of a provider page are expanded with full details.
    pub page_detail_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_detail_limit: 10,
        }
    }
}

/// Where favorite movie ids are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesBackend {
    /// Process-lifetime set, lost on restart.
    #[default]
    Memory,
    /// SQLite file at `favorites.db_path`.
    Sqlite,
}

/// Favorites store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FavoritesConfig {
    pub backend: FavoritesBackend,
    pub db_path: PathBuf,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            backend: FavoritesBackend::Memory,
            db_path: PathBuf::from("./data/marquee.db"),
        }
    }
}
