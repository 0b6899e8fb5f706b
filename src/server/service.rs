//! Favorites operations that combine the repository and the catalog.

use crate::models::FavoriteMovie;
use crate::server::error::ApiError;
use crate::server::shutdown::InFlight;
use crate::server::AppState;

/// Upvote `imdb_id` when it is already a favorite, otherwise look it up in
/// the catalog and store it with zero upvotes.
///
/// The work runs in its own task so a client that disconnects mid-request
/// cannot leave the lookup half done. The task holds its own in-flight
/// guard, so shutdown waits for it even after the request is gone.
pub async fn create_or_upvote(state: &AppState, imdb_id: &str) -> Result<FavoriteMovie, ApiError> {
    let in_flight = state.shutdown.track();
    tokio::spawn(find_or_fetch(state.clone(), imdb_id.to_string(), in_flight))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

async fn find_or_fetch(
    state: AppState,
    imdb_id: String,
    _in_flight: InFlight,
) -> Result<FavoriteMovie, ApiError> {
    if let Some(movie) = state.repository.find_and_upvote(&imdb_id) {
        tracing::debug!(imdb_id = %imdb_id, upvotes = movie.upvotes, "Favorite upvoted");
        return Ok(movie);
    }

    let details = state.catalog.get_by_imdb_id(&imdb_id).await?;
    let movie = state.repository.insert(FavoriteMovie {
        imdb_id: details.imdb_id,
        title: details.title,
        release_year: details.year,
        poster_url: details.poster,
        upvotes: 0,
    });
    tracing::info!(imdb_id = %movie.imdb_id, title = %movie.title, "Favorite created");
    Ok(movie)
}

/// Upvote an existing favorite.
pub fn upvote(state: &AppState, imdb_id: &str) -> Result<FavoriteMovie, ApiError> {
    state.repository.find_and_upvote(imdb_id).ok_or_else(|| {
        ApiError::NotFound(format!("movie with imdbId = '{}' not found in DB", imdb_id))
    })
}
