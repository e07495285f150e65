//! Shared test harness for integration tests.
//!
//! [`TestHarness`] starts a wiremock server standing in for TMDB, wires a
//! real [`TmdbClient`] at it, and serves the full router on a random port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use mq_core::config::Config;
use mq_server::context::AppContext;
use mq_server::favorites::{FavoritesStore, MemoryFavoritesStore};
use mq_server::router::build_router;
use mq_server::tmdb::TmdbClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TOKEN: &str = "test-token";

pub struct TestHarness {
    pub ctx: AppContext,
    pub tmdb: MockServer,
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestHarness {
    /// Harness with in-memory favorites.
    pub async fn start() -> Self {
        Self::with_favorites(Arc::new(MemoryFavoritesStore::new())).await
    }

    pub async fn with_favorites(favorites: Arc<dyn FavoritesStore>) -> Self {
        let tmdb = MockServer::start().await;
        let provider = Arc::new(TmdbClient::with_base_url(Some(TOKEN.into()), tmdb.uri()));
        let ctx = AppContext::new(Config::default(), provider, favorites);
        let app = build_router(ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            ctx,
            tmdb,
            addr,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        read(resp).await
    }

    pub async fn post_body(&self, path: &str, body: &str) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .unwrap();
        read(resp).await
    }

    pub async fn delete_body(&self, path: &str, body: &str) -> (u16, Value) {
        let resp = self
            .client
            .delete(self.url(path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .unwrap();
        read(resp).await
    }

    /// Every request the fake TMDB received so far.
    pub async fn tmdb_requests(&self) -> Vec<Request> {
        self.tmdb.received_requests().await.unwrap_or_default()
    }

    /// Requests to the details endpoint only.
    pub async fn detail_requests(&self) -> Vec<Request> {
        self.tmdb_requests()
            .await
            .into_iter()
            .filter(|r| r.url.path().starts_with("/movie/"))
            .collect()
    }

    /// Mount a details payload for one id.
    pub async fn mount_movie(&self, id: u64, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/movie/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.tmdb)
            .await;
    }

    /// Mount a non-success status for one id.
    pub async fn mount_movie_status(&self, id: u64, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/movie/{id}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })))
            .mount(&self.tmdb)
            .await;
    }

    /// Answer every details request with a minimal payload titled `Movie <id>`.
    pub async fn mount_any_movie(&self) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/movie/\d+$"))
            .respond_with(|req: &Request| {
                let id: u64 = req
                    .url
                    .path()
                    .trim_start_matches("/movie/")
                    .parse()
                    .unwrap();
                ResponseTemplate::new(200).set_body_json(json!({
                    "id": id,
                    "title": format!("Movie {id}"),
                    "release_date": "2010-01-01",
                    "vote_average": 7.25
                }))
            })
            .mount(&self.tmdb)
            .await;
    }
}

async fn read(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

/// A listing page of `n` results with ids `1..=n`.
pub fn listing(page: u32, n: u64, total: u64) -> Value {
    let results: Vec<Value> = (1..=n)
        .map(|id| json!({"id": id, "title": format!("Movie {id}")}))
        .collect();
    json!({
        "page": page,
        "total_results": total,
        "total_pages": total.div_ceil(20),
        "results": results
    })
}
