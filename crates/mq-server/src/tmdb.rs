//! TMDB (The Movie Database) API client.
//!
//! Implements [`MovieProvider`] over TMDB's v3 REST API using a v4 read-access
//! bearer token. No retries and no rate limiting: every failure is surfaced
//! to the caller as [`Error::Upstream`].

use async_trait::async_trait;
use mq_core::config::ProviderConfig;
use mq_core::{CatalogQuery, Error, MovieId, Result};

use crate::provider::{MovieProvider, ProviderMovieDetails, ProviderSearchPage};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    read_token: Option<String>,
    language: Option<String>,
    min_vote_count: u32,
}

impl TmdbClient {
    pub fn new(config: &ProviderConfig) -> Self {
        if config.read_token.is_none() {
            tracing::warn!("No TMDB read token configured; provider requests will be unauthenticated");
        }
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            read_token: config.read_token.clone(),
            language: config.language.clone(),
            min_vote_count: config.min_vote_count,
        }
    }

    /// Client against an arbitrary base URL, with everything else defaulted.
    pub fn with_base_url(read_token: Option<String>, base_url: impl Into<String>) -> Self {
        let config = ProviderConfig {
            base_url: base_url.into(),
            read_token,
            ..ProviderConfig::default()
        };
        Self::new(&config)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, ?params, "TMDB request");

        let mut req = self.http.get(&url).query(params);
        if let Some(language) = &self.language {
            req = req.query(&[("language", language.as_str())]);
        }
        if let Some(token) = &self.read_token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::upstream(None, format!("TMDB request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(%url, %status, %body, "TMDB request rejected");
            return Err(Error::upstream(Some(status.as_u16()), format!("TMDB {status}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| Error::upstream(None, format!("TMDB parse error: {e}")))
    }
}

#[async_trait]
impl MovieProvider for TmdbClient {
    async fn search_or_discover(&self, query: &CatalogQuery) -> Result<ProviderSearchPage> {
        let page = query.page.to_string();
        match &query.search {
            Some(text) => {
                let params = [
                    ("query", text.as_str()),
                    ("page", page.as_str()),
                    ("include_adult", "false"),
                ];
                self.get("/search/movie", &params).await
            }
            None => {
                let sort_by = query.sort_by();
                let min_votes = self.min_vote_count.to_string();
                let params = [
                    ("sort_by", sort_by.as_str()),
                    ("page", page.as_str()),
                    ("include_adult", "false"),
                    ("vote_count.gte", min_votes.as_str()),
                ];
                self.get("/discover/movie", &params).await
            }
        }
    }

    async fn movie_with_credits(&self, id: MovieId) -> Result<ProviderMovieDetails> {
        self.get(&format!("/movie/{id}"), &[("append_to_response", "credits")])
            .await
    }
}
