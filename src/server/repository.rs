//! In-memory favorites table. Nothing survives a restart.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::{FavoriteMovie, SortOrder};

/// Thread-safe list of favorite movies in insertion order.
#[derive(Clone, Default)]
pub struct FavoritesRepository {
    movies: Arc<RwLock<Vec<FavoriteMovie>>>,
}

impl FavoritesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the upvotes of `imdb_id` and return the updated record.
    pub fn find_and_upvote(&self, imdb_id: &str) -> Option<FavoriteMovie> {
        let mut movies = self.movies.write();
        let movie = movies.iter_mut().find(|movie| movie.imdb_id == imdb_id)?;
        movie.upvotes += 1;
        Some(movie.clone())
    }

    /// Store a new favorite.
    ///
    /// When a concurrent request inserted the same id first, that record is
    /// upvoted instead so ids stay unique.
    pub fn insert(&self, movie: FavoriteMovie) -> FavoriteMovie {
        let mut movies = self.movies.write();
        if let Some(existing) = movies.iter_mut().find(|m| m.imdb_id == movie.imdb_id) {
            existing.upvotes += 1;
            return existing.clone();
        }
        movies.push(movie.clone());
        movie
    }

    /// All favorites, unsorted (insertion order) or stably sorted by upvotes.
    pub fn get_all(&self, sort: Option<SortOrder>) -> Vec<FavoriteMovie> {
        let mut movies = self.movies.read().clone();
        match sort {
            None => {}
            Some(SortOrder::Asc) => movies.sort_by_key(|movie| movie.upvotes),
            Some(SortOrder::Des) => movies.sort_by(|a, b| b.upvotes.cmp(&a.upvotes)),
        }
        movies
    }

    pub fn len(&self) -> usize {
        self.movies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
