use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Backend HTTP service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (host:port).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Third-party movie catalog the backend proxies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Usually supplied through `OMDB_API_KEY` instead of the file.
    #[serde(default)]
    pub api_key: String,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

/// Command-line client talking to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_base_url")]
    pub base_url: String,
    /// Upper bound of the search result window.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_catalog_base_url() -> String {
    "https://omdbapi.com".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_client_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_max_search_results() -> usize {
    crate::store::MAX_WINDOW
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            api_key: String::new(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_client_base_url(),
            max_search_results: default_max_search_results(),
        }
    }
}
