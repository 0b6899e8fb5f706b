//! Sliding window over paginated search results.
//!
//! Infinite scrolling keeps fetching pages; only the most recent
//! [`MAX_WINDOW`] hits are retained so memory stays bounded no matter how
//! many results the catalog has.

use crate::models::{SearchResponse, SearchResultItem, SERVER_PAGE_SIZE};

/// Maximum number of search hits retained across pages.
pub const MAX_WINDOW: usize = 50;

/// Search results accumulated across pages of one query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResultBuffer {
    /// Hits in fetch order, newest page at the tail.
    pub movies: Vec<SearchResultItem>,
    pub has_next_page: bool,
    /// Catalog "no results" reason for the last page.
    pub error_response: Option<String>,
}

/// Fold one page of results into the buffer.
///
/// Page 1 starts over; later pages append. The combined list is cut to its
/// last `max_window` entries. A catalog "no results" response short-circuits
/// into a fresh buffer carrying the reason.
pub fn merge(
    previous: Option<SearchResultBuffer>,
    incoming: SearchResponse,
    page: u32,
    max_window: usize,
) -> SearchResultBuffer {
    let total_results = incoming.total_results();

    let movies = match incoming {
        SearchResponse::NoResults { error } => {
            return SearchResultBuffer {
                movies: Vec::new(),
                has_next_page: false,
                error_response: Some(error),
            };
        }
        SearchResponse::Found { movies, .. } => movies,
    };

    let mut merged = if page <= 1 {
        Vec::with_capacity(movies.len())
    } else {
        previous.map(|buffer| buffer.movies).unwrap_or_default()
    };
    merged.extend(movies);
    keep_tail(&mut merged, max_window);

    SearchResultBuffer {
        movies: merged,
        has_next_page: u64::from(page) * SERVER_PAGE_SIZE < total_results,
        error_response: None,
    }
}

/// Drop the oldest entries so at most `max_window` remain.
fn keep_tail<T>(items: &mut Vec<T>, max_window: usize) {
    if items.len() > max_window {
        let excess = items.len() - max_window;
        items.drain(..excess);
    }
}
