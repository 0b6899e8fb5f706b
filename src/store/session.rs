//! Search session lifecycle.
//!
//! The controller plays the role of the UI container: it owns the current
//! `(query_text, page)` pair, starts one fetch per change and cancels the
//! previous one so only the newest session can write results.

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::SearchQuery;
use crate::store::MovieStore;

/// Query text and page currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub query_text: String,
    /// 1-based; reset to 1 whenever the text changes.
    pub page: u32,
}

pub struct SearchSessionController {
    store: MovieStore,
    max_window: usize,
    inner: Mutex<ControllerInner>,
}

#[derive(Default)]
struct ControllerInner {
    session: Option<SearchSession>,
    /// Token of the newest fetch. Cancelled whenever the session moves on.
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ControllerInner {
    fn fetch_in_flight(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl SearchSessionController {
    pub fn new(store: MovieStore, max_window: usize) -> Self {
        Self {
            store,
            max_window,
            inner: Mutex::new(ControllerInner::default()),
        }
    }

    pub fn session(&self) -> Option<SearchSession> {
        self.inner.lock().session.clone()
    }

    /// The user edited the query text.
    ///
    /// Non-empty text starts a new session at page 1. Empty text ends the
    /// session and resets the search cell.
    pub fn on_query_changed(&self, query_text: impl Into<String>) {
        let query_text = query_text.into();
        let mut inner = self.inner.lock();
        inner.cancel.cancel();

        if query_text.is_empty() {
            inner.session = None;
            inner.task = None;
            drop(inner);
            self.store.search_movies().reset();
            return;
        }

        inner.session = Some(SearchSession {
            query_text,
            page: 1,
        });
        self.start_fetch(&mut inner);
    }

    /// The end of the result list scrolled into view.
    ///
    /// Advances to the next page only when the last response reported more
    /// results and no fetch is running. Returns whether a fetch started.
    pub fn fetch_next_page(&self) -> bool {
        let search = self.store.search_movies().state();
        let has_next_page = search
            .value
            .as_ref()
            .is_some_and(|buffer| buffer.has_next_page);
        if search.loading || !has_next_page {
            return false;
        }

        let mut inner = self.inner.lock();
        if inner.fetch_in_flight() {
            return false;
        }
        let Some(session) = inner.session.as_mut() else {
            return false;
        };
        session.page += 1;

        inner.cancel.cancel();
        self.start_fetch(&mut inner);
        true
    }

    /// Wait for the newest fetch to finish writing.
    pub async fn settled(&self) {
        let task = self.inner.lock().task.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Search task failed");
            }
        }
    }

    fn start_fetch(&self, inner: &mut ControllerInner) {
        let Some(session) = inner.session.clone() else {
            return;
        };

        let token = CancellationToken::new();
        inner.cancel = token.clone();

        tracing::debug!(
            query_text = %session.query_text,
            page = session.page,
            "Starting search fetch"
        );

        let search = self.store.search_movies();
        let max_window = self.max_window;
        inner.task = Some(tokio::spawn(async move {
            search
                .call_api(
                    max_window,
                    SearchQuery::new(session.query_text, session.page),
                    token,
                )
                .await;
        }));
    }
}

impl Drop for SearchSessionController {
    fn drop(&mut self) {
        self.inner.get_mut().cancel.cancel();
    }
}
