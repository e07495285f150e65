//! Movie catalog route handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use mq_core::{CatalogQuery, Error, Movie, MovieId, MoviesPage, SortField, SortOrder};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

// ---------------------------------------------------------------------------
// Request / response schemas
// ---------------------------------------------------------------------------

/// Raw listing parameters. Kept as strings so malformed values fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> CatalogQuery {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1);
        CatalogQuery::new(
            self.search.as_deref(),
            page,
            SortField::parse_or_default(self.sort.as_deref()),
            SortOrder::parse_or_default(self.order.as_deref()),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ByIdsParams {
    pub ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoviesData {
    pub data: Vec<Movie>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/movies
pub async fn list_movies(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    Query(params): Query<ListParams>,
) -> Result<Json<MoviesPage>, AppError> {
    let query = params.into_query();
    let page = ctx
        .catalog
        .list_page(&query)
        .await
        .map_err(|e| AppError::new(e).with_request_id(&request_id))?;
    Ok(Json(page))
}

/// GET /api/movies/{id}
pub async fn get_movie(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    Path(raw_id): Path<String>,
) -> Result<Json<Movie>, AppError> {
    let fail = |e: Error| AppError::new(e).with_request_id(&request_id);
    let id: MovieId = raw_id.parse().map_err(fail)?;
    let movie = ctx.catalog.get_movie(id).await.map_err(fail)?;
    Ok(Json(movie))
}

/// GET /api/movies/by-ids?ids=1,2,3
///
/// Invalid and repeated ids are dropped; nothing valid means no provider
/// calls and an empty list.
pub async fn movies_by_ids(
    State(ctx): State<AppContext>,
    request_id: RequestId,
    Query(params): Query<ByIdsParams>,
) -> Result<Json<MoviesData>, AppError> {
    let ids = params
        .ids
        .as_deref()
        .map(MovieId::parse_list)
        .unwrap_or_default();

    let data = ctx
        .catalog
        .fetch_by_ids(&ids)
        .await
        .map_err(|e| AppError::new(e).with_request_id(&request_id))?;
    Ok(Json(MoviesData { data }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, sort: Option<&str>, order: Option<&str>) -> ListParams {
        ListParams {
            page: page.map(String::from),
            search: None,
            sort: sort.map(String::from),
            order: order.map(String::from),
        }
    }

    #[test]
    fn defaults_when_absent() {
        let q = ListParams::default().into_query();
        assert_eq!(q, CatalogQuery::default());
        assert_eq!(q.sort_by(), "vote_average.desc");
    }

    #[test]
    fn malformed_values_fall_back() {
        let q = params(Some("abc"), Some("popularity"), Some("up")).into_query();
        assert_eq!(q.page, 1);
        assert_eq!(q.sort, SortField::Rating);
        assert_eq!(q.order, SortOrder::Desc);

        let q = params(Some("0"), None, None).into_query();
        assert_eq!(q.page, 1);
    }

    #[test]
    fn explicit_values_are_used() {
        let q = params(Some("3"), Some("title"), Some("asc")).into_query();
        assert_eq!(q.page, 3);
        assert_eq!(q.sort_by(), "original_title.asc");
    }
}
