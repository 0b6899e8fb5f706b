//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

pub mod mock_backend;

use async_trait::async_trait;
use movie_tracker::catalog::OmdbClient;
use movie_tracker::client::MoviesApi;
use movie_tracker::config::{Config, ConfigStore};
use movie_tracker::error::ClientError;
use movie_tracker::models::{
    FavoriteMovie, RecordType, SearchQuery, SearchResponse, SearchResultItem, SortOrder,
};
use movie_tracker::server::{MovieServer, ServerHandle};
use movie_tracker::store::{MovieStore, MovieStoreState};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Wait for a server to become available.
pub async fn wait_for_server(addr: SocketAddr, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Backend running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub handle: ServerHandle,
    pub task: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    /// Start a backend whose catalog lives at `catalog_url`.
    pub async fn start(catalog_url: &str) -> Self {
        let mut config = Config::default();
        config.server.bind_addr = "127.0.0.1:0".to_string();
        config.catalog.base_url = catalog_url.to_string();
        config.catalog.api_key = "test-key".to_string();

        let catalog = OmdbClient::new(&config.catalog).expect("catalog client");
        let store = ConfigStore::new(config);
        let server = MovieServer::new(store, Arc::new(catalog)).expect("server");
        let handle = server.handle();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(server.serve(listener));
        assert!(wait_for_server(addr, Duration::from_secs(2)).await);

        Self { addr, handle, task }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Wait until the store state satisfies `predicate`, panicking after 2s.
pub async fn wait_for_state<F>(store: &MovieStore, predicate: F) -> MovieStoreState
where
    F: Fn(&MovieStoreState) -> bool,
{
    let mut updates = store.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(2), updates.wait_for(|s| predicate(s)))
        .await
        .expect("timed out waiting for store state")
        .expect("store dropped");
    state.clone()
}

// -- Sample data --------------------------------------------------------------

pub fn item(n: usize) -> SearchResultItem {
    SearchResultItem {
        title: format!("Batman {}", n),
        year: format!("{}", 1980 + n % 40),
        imdb_id: format!("tt{:07}", n),
        record_type: RecordType::Movie,
        poster: "N/A".to_string(),
    }
}

/// Page of items `range` out of `total` hits.
pub fn found(range: std::ops::Range<usize>, total: u64) -> SearchResponse {
    SearchResponse::Found {
        movies: range.map(item).collect(),
        total_results: total.to_string(),
    }
}

pub fn no_results(reason: &str) -> SearchResponse {
    SearchResponse::NoResults {
        error: reason.to_string(),
    }
}

pub fn favorite(imdb_id: &str, upvotes: u64) -> FavoriteMovie {
    FavoriteMovie {
        imdb_id: imdb_id.to_string(),
        title: format!("Movie {}", imdb_id),
        release_year: "1999".to_string(),
        poster_url: "N/A".to_string(),
        upvotes,
    }
}

pub fn ids(items: &[SearchResultItem]) -> Vec<String> {
    items.iter().map(|item| item.imdb_id.clone()).collect()
}

// -- Scripted MoviesApi -------------------------------------------------------

/// One scripted answer to `search_movies`.
pub struct ScriptedSearch {
    pub result: Result<SearchResponse, ClientError>,
    /// When set, the answer is held back until the gate is notified.
    pub gate: Option<Arc<Notify>>,
    /// Whether a held answer gives up as soon as the token fires. A client
    /// that ignores the token still answers after cancellation.
    pub honors_cancel: bool,
}

impl ScriptedSearch {
    pub fn ready(result: Result<SearchResponse, ClientError>) -> Self {
        Self {
            result,
            gate: None,
            honors_cancel: true,
        }
    }

    pub fn gated(result: Result<SearchResponse, ClientError>, gate: Arc<Notify>) -> Self {
        Self {
            result,
            gate: Some(gate),
            honors_cancel: true,
        }
    }

    pub fn ignoring_cancel(mut self) -> Self {
        self.honors_cancel = false;
        self
    }
}

/// In-process [`MoviesApi`] with scripted searches and an in-memory
/// favorites table mirroring the backend's behavior.
#[derive(Default)]
pub struct ScriptedApi {
    searches: Mutex<VecDeque<ScriptedSearch>>,
    search_calls: Mutex<Vec<SearchQuery>>,
    favorites: Mutex<Vec<FavoriteMovie>>,
    get_all_calls: AtomicUsize,
    get_all_failures: Mutex<VecDeque<ClientError>>,
    get_all_gates: Mutex<VecDeque<Arc<Notify>>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_search(&self, search: ScriptedSearch) {
        self.searches.lock().push_back(search);
    }

    pub fn search_calls(&self) -> Vec<SearchQuery> {
        self.search_calls.lock().clone()
    }

    pub fn seed_favorite(&self, movie: FavoriteMovie) {
        self.favorites.lock().push(movie);
    }

    pub fn get_all_calls(&self) -> usize {
        self.get_all_calls.load(Ordering::SeqCst)
    }

    /// Make the next `get_all_favorite_movies` call fail with `error`.
    pub fn fail_next_get_all(&self, error: ClientError) {
        self.get_all_failures.lock().push_back(error);
    }

    /// Hold the answer of the next `get_all_favorite_movies` call until
    /// `gate` is notified. The list is read before waiting, so the held
    /// answer reflects the favorites at call time.
    pub fn gate_next_get_all(&self, gate: Arc<Notify>) {
        self.get_all_gates.lock().push_back(gate);
    }

    /// Wait until `get_all_favorite_movies` was called `count` times.
    pub async fn wait_for_get_all_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.get_all_calls() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timed out waiting for get_all_favorite_movies");
    }
}

#[async_trait]
impl MoviesApi for ScriptedApi {
    async fn search_movies(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse, ClientError> {
        self.search_calls.lock().push(query.clone());
        let scripted = self
            .searches
            .lock()
            .pop_front()
            .unwrap_or_else(|| ScriptedSearch::ready(Ok(no_results("Movie not found!"))));

        if let Some(gate) = scripted.gate {
            if scripted.honors_cancel {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                    _ = gate.notified() => {}
                }
            } else {
                gate.notified().await;
            }
        }
        scripted.result
    }

    async fn get_all_favorite_movies(
        &self,
        sort: Option<SortOrder>,
    ) -> Result<Vec<FavoriteMovie>, ClientError> {
        let gate = self.get_all_gates.lock().pop_front();
        let failure = self.get_all_failures.lock().pop_front();
        let mut movies = self.favorites.lock().clone();
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(error) = failure {
            return Err(error);
        }

        match sort {
            None => {}
            Some(SortOrder::Asc) => movies.sort_by_key(|m| m.upvotes),
            Some(SortOrder::Des) => movies.sort_by(|a, b| b.upvotes.cmp(&a.upvotes)),
        }
        Ok(movies)
    }

    async fn create_or_upvote_favorite_movie(
        &self,
        imdb_id: &str,
    ) -> Result<FavoriteMovie, ClientError> {
        let mut favorites = self.favorites.lock();
        if let Some(movie) = favorites.iter_mut().find(|m| m.imdb_id == imdb_id) {
            movie.upvotes += 1;
            return Ok(movie.clone());
        }
        let movie = favorite(imdb_id, 0);
        favorites.push(movie.clone());
        Ok(movie)
    }

    async fn upvote_favorite_movie(&self, imdb_id: &str) -> Result<FavoriteMovie, ClientError> {
        let mut favorites = self.favorites.lock();
        match favorites.iter_mut().find(|m| m.imdb_id == imdb_id) {
            Some(movie) => {
                movie.upvotes += 1;
                Ok(movie.clone())
            }
            None => Err(ClientError::NotFound {
                message: format!("movie with imdbId = '{}' not found in DB", imdb_id),
            }),
        }
    }
}
