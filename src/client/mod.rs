//! Remote data client for the movies backend.
//!
//! [`MoviesApi`] is the seam the store depends on; [`HttpMoviesClient`] is
//! the production implementation talking to the REST contract.

mod http;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::models::{FavoriteMovie, SearchQuery, SearchResponse, SortOrder};

pub use http::HttpMoviesClient;

/// Typed operations of the movies backend.
///
/// Every call issues exactly one request and validates the payload before
/// resolving. There is no retry; failures propagate to the caller.
#[async_trait]
pub trait MoviesApi: Send + Sync {
    /// Search the catalog through the backend.
    ///
    /// Resolves to `Err(ClientError::Cancelled)` when `cancel` fires first.
    async fn search_movies(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse, ClientError>;

    async fn get_all_favorite_movies(
        &self,
        sort: Option<SortOrder>,
    ) -> Result<Vec<FavoriteMovie>, ClientError>;

    async fn create_or_upvote_favorite_movie(
        &self,
        imdb_id: &str,
    ) -> Result<FavoriteMovie, ClientError>;

    /// Fails with [`ClientError::NotFound`] when the id is unknown.
    async fn upvote_favorite_movie(&self, imdb_id: &str) -> Result<FavoriteMovie, ClientError>;
}
