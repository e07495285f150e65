//! Axum router construction.
//!
//! Builds the application router with the API routes, middleware layers,
//! and optional static file serving for a built UI.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::tag_request;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Movies
        .route("/movies", get(routes::movies::list_movies))
        .route("/movies/by-ids", get(routes::movies::movies_by_ids))
        .route("/movies/{id}", get(routes::movies::get_movie))
        // Favorites
        .route(
            "/favorites",
            get(routes::favorites::list_favorites)
                .post(routes::favorites::add_favorite)
                .delete(routes::favorites::remove_favorite),
        );

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(tag_request))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Static file serving for UI build.
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                tower_http::services::ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(tower_http::services::ServeFile::new(index_path)),
            );
        } else {
            tracing::warn!("Static directory {:?} does not exist; not serving UI", dir);
        }
    }

    app
}
