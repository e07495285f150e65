//! Favorites route handlers.
//!
//! Mutations take a JSON body `{"id": <number>}`. Anything else, including
//! a body that is not JSON at all, is rejected with `Invalid id` before the
//! store is touched.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use mq_core::{Error, MovieId};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

#[derive(Debug, Serialize)]
pub struct FavoriteIds {
    pub ids: Vec<MovieId>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

fn body_id(body: &[u8]) -> Result<MovieId, Error> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| Error::invalid_id())?;
    value
        .get("id")
        .map(MovieId::from_json)
        .unwrap_or_else(|| Err(Error::invalid_id()))
}

/// GET /api/favorites
pub async fn list_favorites(
    State(ctx): State<AppContext>,
    request_id: RequestId,
) -> Result<Json<FavoriteIds>, AppError> {
    let ids = ctx
        .favorites
        .list()
        .map_err(|e| AppError::new(e).with_request_id(&request_id))?;
    Ok(Json(FavoriteIds { ids }))
}

/// POST /api/favorites
pub async fn add_favorite(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    body: Bytes,
) -> Result<Json<Ack>, AppError> {
    body_id(&body)
        .and_then(|id| {
            tracing::debug!(movie_id = %id, "Adding favorite");
            ctx.favorites.add(id)
        })
        .map_err(|e| AppError::new(e).with_request_id(&request_id))?;
    Ok(Json(Ack { ok: true }))
}

/// DELETE /api/favorites
pub async fn remove_favorite(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    body: Bytes,
) -> Result<Json<Ack>, AppError> {
    body_id(&body)
        .and_then(|id| {
            tracing::debug!(movie_id = %id, "Removing favorite");
            ctx.favorites.remove(id)
        })
        .map_err(|e| AppError::new(e).with_request_id(&request_id))?;
    Ok(Json(Ack { ok: true }))
}
