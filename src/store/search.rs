//! Search cell: intents, reducer and the `search_movies` action.

use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::models::{SearchQuery, SearchResponse};
use crate::store::mvi::{Intent, Reducer};
use crate::store::window::{merge, SearchResultBuffer};
use crate::store::{replace_if_changed, AsyncCell, MovieStore};

/// Lifecycle events of one search request.
#[derive(Debug, Clone)]
pub enum SearchIntent {
    /// A request for `page` was issued.
    Begin { page: u32 },
    /// The catalog answered for `page`.
    Received {
        page: u32,
        response: SearchResponse,
        max_window: usize,
    },
    /// Transport or validation failure.
    Failed(ClientError),
    /// Query cleared; forget everything.
    Reset,
}

impl Intent for SearchIntent {}

pub struct SearchReducer;

impl Reducer for SearchReducer {
    type State = AsyncCell<SearchResultBuffer>;
    type Intent = SearchIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SearchIntent::Begin { page } => AsyncCell {
                loading: true,
                error: None,
                // Drop the previous reason and pagination flag; a new title
                // also drops the hits.
                value: state.value.map(|buffer| SearchResultBuffer {
                    movies: if page <= 1 { Vec::new() } else { buffer.movies },
                    has_next_page: false,
                    error_response: None,
                }),
            },
            SearchIntent::Received {
                page,
                response,
                max_window,
            } => AsyncCell {
                loading: false,
                error: state.error,
                value: Some(merge(state.value, response, page, max_window)),
            },
            SearchIntent::Failed(ClientError::Cancelled) => state,
            SearchIntent::Failed(error) => AsyncCell {
                loading: false,
                error: Some(error),
                value: state.value,
            },
            SearchIntent::Reset => AsyncCell::default(),
        }
    }
}

/// Handle on the search capability of a [`MovieStore`].
pub struct SearchMovies {
    store: MovieStore,
}

impl SearchMovies {
    pub(crate) fn new(store: MovieStore) -> Self {
        Self { store }
    }

    pub fn state(&self) -> AsyncCell<SearchResultBuffer> {
        self.store.read(|state| state.search_movies.clone())
    }

    /// Fetch one page and fold it into the result window.
    ///
    /// An empty title resets the cell instead. The response is discarded
    /// without touching the cell when `cancel` fired or a newer search
    /// started in the meantime.
    pub async fn call_api(&self, max_window: usize, query: SearchQuery, cancel: CancellationToken) {
        if query.title.is_empty() {
            self.reset();
            return;
        }

        // A token cancelled before this point belongs to a superseded
        // session; starting it would invalidate the newer generation.
        let mut started = None;
        self.store.update(|state| {
            if cancel.is_cancelled() {
                return false;
            }
            started = Some(self.store.next_search_generation());
            let next = SearchReducer::reduce(
                state.search_movies.clone(),
                SearchIntent::Begin { page: query.page },
            );
            replace_if_changed(&mut state.search_movies, next)
        });
        let Some(generation) = started else {
            tracing::debug!(title = %query.title, page = query.page, "Search cancelled before start");
            return;
        };

        let intent = match self.store.api().search_movies(&query, &cancel).await {
            Ok(response) => SearchIntent::Received {
                page: query.page,
                response,
                max_window,
            },
            Err(ClientError::Cancelled) => {
                tracing::debug!(
                    title = %query.title,
                    page = query.page,
                    generation,
                    "Search cancelled"
                );
                return;
            }
            Err(error) => {
                tracing::warn!(
                    title = %query.title,
                    page = query.page,
                    error = %error,
                    "Search failed"
                );
                SearchIntent::Failed(error)
            }
        };

        let mut stale = false;
        self.store.update(|state| {
            if cancel.is_cancelled() || self.store.search_generation() != generation {
                stale = true;
                return false;
            }
            let next = SearchReducer::reduce(state.search_movies.clone(), intent);
            replace_if_changed(&mut state.search_movies, next)
        });

        if stale {
            tracing::debug!(
                title = %query.title,
                page = query.page,
                generation,
                "Discarding superseded search response"
            );
        }
    }

    /// Return the cell to its idle state and invalidate in-flight searches.
    pub fn reset(&self) {
        self.store.update(|state| {
            self.store.next_search_generation();
            let next = SearchReducer::reduce(state.search_movies.clone(), SearchIntent::Reset);
            replace_if_changed(&mut state.search_movies, next)
        });
    }
}
