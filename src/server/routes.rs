use std::collections::HashMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::models::{ApiSuccessResponse, FavoriteMovie, SearchResponse};
use crate::server::error::ApiError;
use crate::server::request_log::log_request;
use crate::server::service;
use crate::server::validation::{FavoriteListParams, SearchParams};
use crate::server::AppState;

type ApiResult<T> = Result<Json<ApiSuccessResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

/// Routes of the movie API. `/health` is not access-logged.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/movies/search", get(search_movies))
        .route("/movies/favorite", get(get_all_favorite_movies))
        .route(
            "/movies/favorite/{imdb_id}/createOrUpvote",
            post(create_or_upvote_favorite_movie),
        )
        .route(
            "/movies/favorite/{imdb_id}/upvote",
            patch(upvote_favorite_movie),
        )
        .route_layer(middleware::from_fn(log_request))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(state.clone(), track_in_flight))
        .with_state(state)
}

/// Holds an in-flight guard for the lifetime of each request.
async fn track_in_flight(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let _in_flight = state.shutdown.track();
    next.run(request).await
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: "movie-tracker".to_string(),
    })
}

fn query_params(
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<HashMap<String, String>, ApiError> {
    query.map(|Query(params)| params).map_err(|rejection| ApiError::Validation {
        message: "Query params validation failed".to_string(),
        details: Some(serde_json::json!({ "_errors": [rejection.body_text()] })),
    })
}

async fn search_movies(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<SearchResponse> {
    let params = SearchParams::parse(&query_params(query)?)?;
    let data = state
        .catalog
        .search_by_title(&params.title, params.page)
        .await?;
    Ok(Json(ApiSuccessResponse { data }))
}

async fn get_all_favorite_movies(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Vec<FavoriteMovie>> {
    let params = FavoriteListParams::parse(&query_params(query)?)?;
    let data = state.repository.get_all(params.sort_by_upvotes);
    Ok(Json(ApiSuccessResponse { data }))
}

async fn create_or_upvote_favorite_movie(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> ApiResult<FavoriteMovie> {
    let data = service::create_or_upvote(&state, &imdb_id).await?;
    Ok(Json(ApiSuccessResponse { data }))
}

async fn upvote_favorite_movie(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> ApiResult<FavoriteMovie> {
    let data = service::upvote(&state, &imdb_id)?;
    Ok(Json(ApiSuccessResponse { data }))
}
