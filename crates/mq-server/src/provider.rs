//! Trait definition and raw payload types for the movie provider.
//!
//! [`MovieProvider`] is the seam between catalog aggregation and the external
//! metadata service. The payload types mirror the provider's JSON loosely:
//! optional fields that arrive with the wrong JSON type are treated as absent
//! instead of failing the whole response.

use async_trait::async_trait;
use mq_core::{CatalogQuery, MovieId, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async interface to the external movie metadata provider.
///
/// Implementations must surface any non-success provider status as
/// [`mq_core::Error::Upstream`] and must not retry.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Text search when `query.search` is set, otherwise ranked discovery
    /// ordered by `query.sort`/`query.order`.
    async fn search_or_discover(&self, query: &CatalogQuery) -> Result<ProviderSearchPage>;

    /// Movie details with embedded credits, in a single round trip.
    async fn movie_with_credits(&self, id: MovieId) -> Result<ProviderMovieDetails>;
}

// ---------------------------------------------------------------------------
// Search / discover
// ---------------------------------------------------------------------------

/// One page of search or discovery results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSearchPage {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total_results: Option<u64>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub results: Vec<ProviderSearchItem>,
}

/// A search hit. Only the id is needed to expand it into full details.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSearchItem {
    pub id: MovieId,
}

// ---------------------------------------------------------------------------
// Details + credits
// ---------------------------------------------------------------------------

/// Movie details with `append_to_response=credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMovieDetails {
    pub id: MovieId,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub genres: Vec<ProviderGenre>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub credits: Option<ProviderCredits>,
}

impl ProviderMovieDetails {
    /// Details with only the id set; handy for building fixtures.
    pub fn bare(id: MovieId) -> Self {
        Self {
            id,
            title: None,
            original_title: None,
            release_date: None,
            vote_average: None,
            overview: None,
            poster_path: None,
            genres: Vec::new(),
            credits: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderGenre {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderCredits {
    #[serde(default, deserialize_with = "lenient::list")]
    pub cast: Vec<ProviderCastMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCastMember {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub popularity: Option<f64>,
}

/// Deserializers that degrade mistyped values to "absent".
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn optional<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(de)?;
        Ok(serde_json::from_value(value).ok())
    }

    /// Non-arrays become empty; array elements that do not fit are skipped.
    pub(super) fn list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(de)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
