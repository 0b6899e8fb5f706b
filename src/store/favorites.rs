//! Favorites list and the two mutations that change it.
//!
//! Mutations never patch the list locally. After a successful mutation the
//! list is re-fetched sorted by upvotes (descending) so the displayed order
//! always matches the server. Fetches of the list may overlap; each one
//! takes a generation when it starts and only the newest may settle the
//! cell, so an older answer can never replace a newer list.

use crate::models::{FavoriteMovie, SortOrder};
use crate::store::mvi::Reducer;
use crate::store::{
    replace_if_changed, AsyncCell, CellIntent, CellReducer, MovieStore, MovieStoreState,
};

type FavoritesListReducer = CellReducer<Vec<FavoriteMovie>>;
type FavoriteReducer = CellReducer<FavoriteMovie>;

/// Order used when a mutation refreshes the list.
const REFRESH_ORDER: SortOrder = SortOrder::Des;

/// Fetch-and-replace of the whole favorites list.
pub struct GetAllFavoriteMovies {
    store: MovieStore,
}

impl GetAllFavoriteMovies {
    pub(crate) fn new(store: MovieStore) -> Self {
        Self { store }
    }

    pub fn state(&self) -> AsyncCell<Vec<FavoriteMovie>> {
        self.store.read(|state| state.get_all_favorite_movies.clone())
    }

    pub async fn call_api(&self, sort: Option<SortOrder>) {
        let mut generation = 0;
        self.store.update(|state| {
            let (started, changed) = begin_list_fetch(&self.store, state);
            generation = started;
            changed
        });
        self.complete(sort, generation).await;
    }

    /// Second half of a fetch whose `Started` was already dispatched under
    /// `generation`.
    async fn complete(&self, sort: Option<SortOrder>, generation: u64) {
        let intent = match self.store.api().get_all_favorite_movies(sort).await {
            Ok(movies) => {
                tracing::debug!(count = movies.len(), generation, "Favorite movies fetched");
                CellIntent::Resolved(movies)
            }
            Err(error) => {
                tracing::warn!(error = %error, generation, "Failed to fetch favorite movies");
                CellIntent::Failed(error)
            }
        };

        let mut superseded = false;
        self.store.update(|state| {
            if self.store.favorites_generation() != generation {
                superseded = true;
                return false;
            }
            let next = FavoritesListReducer::reduce(state.get_all_favorite_movies.clone(), intent);
            replace_if_changed(&mut state.get_all_favorite_movies, next)
        });

        if superseded {
            tracing::debug!(generation, "Superseded favorites fetch dropped");
        }
    }
}

/// Mark the list loading and claim a new fetch generation. Runs inside a
/// store update so the claim and the `Started` transition are one step.
/// Returns the generation and whether the cell changed.
fn begin_list_fetch(store: &MovieStore, state: &mut MovieStoreState) -> (u64, bool) {
    let generation = store.next_favorites_generation();
    let next = FavoritesListReducer::reduce(
        state.get_all_favorite_movies.clone(),
        CellIntent::Started,
    );
    (generation, replace_if_changed(&mut state.get_all_favorite_movies, next))
}

/// Add a movie to favorites, or upvote it when already present.
pub struct CreateOrUpvoteFavoriteMovie {
    store: MovieStore,
}

impl CreateOrUpvoteFavoriteMovie {
    pub(crate) fn new(store: MovieStore) -> Self {
        Self { store }
    }

    pub fn state(&self) -> AsyncCell<FavoriteMovie> {
        self.store.read(|state| state.create_or_upvote_favorite_movie.clone())
    }

    pub async fn call_api(&self, imdb_id: &str) {
        dispatch_cell!(
            self.store,
            create_or_upvote_favorite_movie,
            FavoriteReducer,
            CellIntent::Started
        );

        match self.store.api().create_or_upvote_favorite_movie(imdb_id).await {
            Ok(movie) => {
                tracing::info!(
                    imdb_id = %movie.imdb_id,
                    upvotes = movie.upvotes,
                    "Favorite movie created or upvoted"
                );
                resolve_and_refresh(&self.store, create_or_upvote_cell, movie);
            }
            Err(error) => {
                tracing::warn!(imdb_id = %imdb_id, error = %error, "Create or upvote failed");
                dispatch_cell!(
                    self.store,
                    create_or_upvote_favorite_movie,
                    FavoriteReducer,
                    CellIntent::Failed(error)
                );
            }
        }
    }
}

/// Upvote a movie already in the favorites list.
pub struct UpvoteFavoriteMovie {
    store: MovieStore,
}

impl UpvoteFavoriteMovie {
    pub(crate) fn new(store: MovieStore) -> Self {
        Self { store }
    }

    pub fn state(&self) -> AsyncCell<FavoriteMovie> {
        self.store.read(|state| state.upvote_favorite_movie.clone())
    }

    pub async fn call_api(&self, imdb_id: &str) {
        dispatch_cell!(self.store, upvote_favorite_movie, FavoriteReducer, CellIntent::Started);

        match self.store.api().upvote_favorite_movie(imdb_id).await {
            Ok(movie) => {
                tracing::info!(
                    imdb_id = %movie.imdb_id,
                    upvotes = movie.upvotes,
                    "Favorite movie upvoted"
                );
                resolve_and_refresh(&self.store, upvote_cell, movie);
            }
            Err(error) => {
                tracing::warn!(imdb_id = %imdb_id, error = %error, "Upvote failed");
                dispatch_cell!(
                    self.store,
                    upvote_favorite_movie,
                    FavoriteReducer,
                    CellIntent::Failed(error)
                );
            }
        }
    }
}

fn create_or_upvote_cell(state: &mut MovieStoreState) -> &mut AsyncCell<FavoriteMovie> {
    &mut state.create_or_upvote_favorite_movie
}

fn upvote_cell(state: &mut MovieStoreState) -> &mut AsyncCell<FavoriteMovie> {
    &mut state.upvote_favorite_movie
}

/// Store the mutated movie and start the list refresh in one transition,
/// then finish the refresh in the background.
///
/// Raising the list's `loading` in the same update keeps the combined busy
/// indicator from dropping between the mutation and its refresh.
fn resolve_and_refresh(
    store: &MovieStore,
    cell: fn(&mut MovieStoreState) -> &mut AsyncCell<FavoriteMovie>,
    movie: FavoriteMovie,
) {
    let mut generation = 0;
    store.update(|state| {
        let mutated = FavoriteReducer::reduce(cell(state).clone(), CellIntent::Resolved(movie));
        let mutated_changed = replace_if_changed(cell(state), mutated);
        let (started, list_changed) = begin_list_fetch(store, state);
        generation = started;
        mutated_changed || list_changed
    });

    let list = GetAllFavoriteMovies::new(store.clone());
    tokio::spawn(async move {
        list.complete(Some(REFRESH_ORDER), generation).await;
    });
}
