//! Catalog aggregation: listing pages and by-id lookups.
//!
//! Every movie is expanded through [`MovieProvider::movie_with_credits`] and
//! normalized. Fan-outs run all requests concurrently with no cap; the
//! all-or-nothing variants fail as soon as any request fails.

use std::sync::Arc;

use futures::future::{join_all, try_join_all};
use mq_core::{CatalogQuery, Error, Movie, MovieId, MoviesPage, Result};

use crate::normalize::normalize;
use crate::provider::MovieProvider;

pub struct Catalog {
    provider: Arc<dyn MovieProvider>,
    page_detail_limit: usize,
}

impl Catalog {
    pub fn new(provider: Arc<dyn MovieProvider>, page_detail_limit: usize) -> Self {
        Self {
            provider,
            page_detail_limit,
        }
    }

    /// One listing page. Only the first `page_detail_limit` results are
    /// expanded; `total` is the provider's count across all pages.
    pub async fn list_page(&self, query: &CatalogQuery) -> Result<MoviesPage> {
        let listing = self.provider.search_or_discover(query).await?;

        let ids: Vec<MovieId> = listing
            .results
            .iter()
            .take(self.page_detail_limit)
            .map(|item| item.id)
            .collect();
        tracing::debug!(
            search = ?query.search,
            page = query.page,
            results = listing.results.len(),
            expanding = ids.len(),
            "Catalog page listed"
        );

        let data = self.fetch_all(&ids).await?;

        Ok(MoviesPage {
            data,
            page: listing.page.filter(|p| *p > 0).unwrap_or(query.page),
            total: listing.total_results.unwrap_or(0),
        })
    }

    /// Fetch and normalize every id. An empty slice makes no provider calls.
    ///
    /// Results follow the order of `ids`. If any fetch fails the whole call
    /// fails with [`Error::Aggregate`].
    pub async fn fetch_by_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_all(ids).await
    }

    /// A single movie.
    pub async fn get_movie(&self, id: MovieId) -> Result<Movie> {
        let mut movies = self.fetch_by_ids(&[id]).await?;
        movies
            .pop()
            .ok_or_else(|| Error::Internal(format!("no result for movie {id}")))
    }

    /// Like [`Catalog::fetch_by_ids`] but every request runs to completion
    /// and each id carries its own outcome.
    pub async fn fetch_each(&self, ids: &[MovieId]) -> Vec<(MovieId, Result<Movie>)> {
        let results = join_all(ids.iter().map(|&id| self.fetch_one(id))).await;
        ids.iter().copied().zip(results).collect()
    }

    async fn fetch_all(&self, ids: &[MovieId]) -> Result<Vec<Movie>> {
        let total = ids.len();
        try_join_all(ids.iter().map(|&id| async move {
            self.fetch_one(id).await.map_err(|source| {
                tracing::warn!(movie_id = %id, error = %source, "Movie fetch failed; aborting group");
                Error::Aggregate {
                    failed: id.get(),
                    total,
                    source: Box::new(source),
                }
            })
        }))
        .await
    }

    async fn fetch_one(&self, id: MovieId) -> Result<Movie> {
        let raw = self.provider.movie_with_credits(id).await?;
        Ok(normalize(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderMovieDetails, ProviderSearchItem, ProviderSearchPage};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-process provider with call counters and per-id failure injection.
    #[derive(Default)]
    struct FakeProvider {
        listing: ProviderSearchPage,
        failing: HashSet<u64>,
        detail_calls: AtomicUsize,
        list_calls: AtomicUsize,
        seen_queries: Mutex<Vec<CatalogQuery>>,
    }

    impl FakeProvider {
        fn with_results(n: u64) -> Self {
            let results = (1..=n)
                .map(|raw| ProviderSearchItem { id: id(raw) })
                .collect();
            Self {
                listing: ProviderSearchPage {
                    page: Some(1),
                    total_results: Some(n * 10),
                    results,
                },
                ..Self::default()
            }
        }

        fn failing_on(mut self, raw: u64) -> Self {
            self.failing.insert(raw);
            self
        }
    }

    #[async_trait]
    impl MovieProvider for FakeProvider {
        async fn search_or_discover(&self, query: &CatalogQuery) -> Result<ProviderSearchPage> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_queries.lock().push(query.clone());
            Ok(self.listing.clone())
        }

        async fn movie_with_credits(&self, id: MovieId) -> Result<ProviderMovieDetails> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&id.get()) {
                return Err(Error::upstream(Some(503), "TMDB 503"));
            }
            let mut details = ProviderMovieDetails::bare(id);
            details.title = Some(format!("Movie {id}"));
            Ok(details)
        }
    }

    fn id(raw: u64) -> MovieId {
        MovieId::new(raw).unwrap()
    }

    fn catalog(provider: &Arc<FakeProvider>) -> Catalog {
        Catalog::new(provider.clone(), 10)
    }

    #[tokio::test]
    async fn empty_ids_make_no_calls() {
        let provider = Arc::new(FakeProvider::default());
        let movies = catalog(&provider).fetch_by_ids(&[]).await.unwrap();
        assert!(movies.is_empty());
        assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_by_ids_keeps_input_order() {
        let provider = Arc::new(FakeProvider::default());
        let movies = catalog(&provider)
            .fetch_by_ids(&[id(3), id(1), id(2)])
            .await
            .unwrap();
        let ids: Vec<u64> = movies.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(movies[0].title, "Movie 3");
        assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch() {
        let provider = Arc::new(FakeProvider::default().failing_on(2));
        let err = catalog(&provider)
            .fetch_by_ids(&[id(1), id(2), id(3)])
            .await
            .unwrap_err();
        match &err {
            Error::Aggregate { failed, total, .. } => {
                assert_eq!(*failed, 2);
                assert_eq!(*total, 3);
            }
            other => panic!("expected aggregate error, got {other:?}"),
        }
        assert_eq!(err.http_status(), 503);
        assert_eq!(err.public_message(), "Movie provider request failed");
    }

    #[tokio::test]
    async fn get_movie_single_lookup() {
        let provider = Arc::new(FakeProvider::default());
        let movie = catalog(&provider).get_movie(id(42)).await.unwrap();
        assert_eq!(movie.id, id(42));
        assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn list_page_expands_at_most_limit() {
        let provider = Arc::new(FakeProvider::with_results(20));
        let page = catalog(&provider)
            .list_page(&CatalogQuery::default())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.data[0].id, id(1));
        assert_eq!(page.data[9].id, id(10));
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 200);
        assert_eq!(provider.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn list_page_short_listing() {
        let provider = Arc::new(FakeProvider::with_results(3));
        let page = catalog(&provider)
            .list_page(&CatalogQuery::default())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn list_page_defaults_page_and_total() {
        let mut fake = FakeProvider::with_results(2);
        fake.listing.page = None;
        fake.listing.total_results = None;
        let provider = Arc::new(fake);

        let query = CatalogQuery::new(Some("x"), 4, Default::default(), Default::default());
        let page = catalog(&provider).list_page(&query).await.unwrap();
        assert_eq!(page.page, 4);
        assert_eq!(page.total, 0);
        assert_eq!(provider.seen_queries.lock()[0].search.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn list_page_fails_when_any_detail_fails() {
        let provider = Arc::new(FakeProvider::with_results(5).failing_on(4));
        let err = catalog(&provider)
            .list_page(&CatalogQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Aggregate { failed: 4, .. }));
    }

    #[tokio::test]
    async fn list_page_ignores_results_beyond_limit_failing() {
        // Result 15 would fail, but it is never expanded.
        let provider = Arc::new(FakeProvider::with_results(20).failing_on(15));
        let page = catalog(&provider)
            .list_page(&CatalogQuery::default())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 10);
    }

    #[tokio::test]
    async fn fetch_each_reports_per_item() {
        let provider = Arc::new(FakeProvider::default().failing_on(2));
        let results = catalog(&provider).fetch_each(&[id(1), id(2), id(3)]).await;
        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, id(2));
        assert!(matches!(results[1].1, Err(Error::Upstream { status: Some(503), .. })));
        assert!(results[2].1.is_ok());
        assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 3);
    }
}
