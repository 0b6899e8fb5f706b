//! Reactive store for search and favorites.
//!
//! [`MovieStore`] owns every [`AsyncCell`] and publishes whole-state
//! snapshots through a `tokio::sync::watch` channel. Each cell transition is
//! computed by a reducer and written under the channel's lock, so readers
//! see a cell either fully before or fully after an update. Updates that
//! leave the state unchanged notify nobody.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::client::MoviesApi;
use crate::models::FavoriteMovie;

/// Apply one reducer step to a cell of the store state.
macro_rules! dispatch_cell {
    ($store:expr, $field:ident, $reducer:ty, $intent:expr) => {
        $store.update(|state| {
            let next = <$reducer as $crate::store::mvi::Reducer>::reduce(
                state.$field.clone(),
                $intent,
            );
            $crate::store::replace_if_changed(&mut state.$field, next)
        })
    };
}

mod cell;
mod favorites;
pub mod mvi;
mod search;
mod session;
mod window;

pub use cell::{AsyncCell, CellIntent, CellReducer};
pub use favorites::{CreateOrUpvoteFavoriteMovie, GetAllFavoriteMovies, UpvoteFavoriteMovie};
pub use search::{SearchIntent, SearchMovies, SearchReducer};
pub use session::{SearchSession, SearchSessionController};
pub use window::{merge, SearchResultBuffer, MAX_WINDOW};

/// Snapshot of every capability the store exposes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieStoreState {
    pub get_all_favorite_movies: AsyncCell<Vec<FavoriteMovie>>,
    pub upvote_favorite_movie: AsyncCell<FavoriteMovie>,
    pub create_or_upvote_favorite_movie: AsyncCell<FavoriteMovie>,
    pub search_movies: AsyncCell<SearchResultBuffer>,
}

impl mvi::StoreState for MovieStoreState {}

impl MovieStoreState {
    /// True while any operation touching the favorites list is in flight.
    pub fn favorites_busy(&self) -> bool {
        self.get_all_favorite_movies.loading
            || self.create_or_upvote_favorite_movie.loading
            || self.upvote_favorite_movie.loading
    }
}

/// Explicitly constructed state container with an injected remote client.
///
/// Cloning is cheap and every clone addresses the same state.
#[derive(Clone)]
pub struct MovieStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    api: Arc<dyn MoviesApi>,
    state: watch::Sender<MovieStoreState>,
    /// Bumped whenever a search starts or is reset; stale responses carry
    /// an older value and are dropped.
    search_generation: AtomicU64,
    /// Bumped whenever a favorites list fetch starts; only the newest fetch
    /// may settle the list cell.
    favorites_generation: AtomicU64,
}

impl MovieStore {
    pub fn new(api: Arc<dyn MoviesApi>) -> Self {
        let (state, _) = watch::channel(MovieStoreState::default());
        Self {
            inner: Arc::new(StoreInner {
                api,
                state,
                search_generation: AtomicU64::new(0),
                favorites_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Consistent copy of the whole store.
    pub fn snapshot(&self) -> MovieStoreState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified after every effective state change.
    pub fn subscribe(&self) -> watch::Receiver<MovieStoreState> {
        self.inner.state.subscribe()
    }

    pub fn search_movies(&self) -> SearchMovies {
        SearchMovies::new(self.clone())
    }

    pub fn get_all_favorite_movies(&self) -> GetAllFavoriteMovies {
        GetAllFavoriteMovies::new(self.clone())
    }

    pub fn create_or_upvote_favorite_movie(&self) -> CreateOrUpvoteFavoriteMovie {
        CreateOrUpvoteFavoriteMovie::new(self.clone())
    }

    pub fn upvote_favorite_movie(&self) -> UpvoteFavoriteMovie {
        UpvoteFavoriteMovie::new(self.clone())
    }

    pub(crate) fn api(&self) -> &dyn MoviesApi {
        self.inner.api.as_ref()
    }

    pub(crate) fn read<R>(&self, read: impl FnOnce(&MovieStoreState) -> R) -> R {
        read(&self.inner.state.borrow())
    }

    /// Mutate the state atomically. `modify` reports whether anything
    /// changed; observers are only woken when it did.
    pub(crate) fn update(&self, modify: impl FnOnce(&mut MovieStoreState) -> bool) -> bool {
        self.inner.state.send_if_modified(modify)
    }

    pub(crate) fn next_search_generation(&self) -> u64 {
        self.inner.search_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn search_generation(&self) -> u64 {
        self.inner.search_generation.load(Ordering::SeqCst)
    }

    pub(crate) fn next_favorites_generation(&self) -> u64 {
        self.inner.favorites_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn favorites_generation(&self) -> u64 {
        self.inner.favorites_generation.load(Ordering::SeqCst)
    }
}

/// Store `next` into `slot` unless it is structurally equal.
pub(crate) fn replace_if_changed<S: PartialEq>(slot: &mut S, next: S) -> bool {
    if *slot == next {
        return false;
    }
    *slot = next;
    true
}
