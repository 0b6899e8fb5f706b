mod loader;
mod store;
mod types;

pub use loader::{ConfigError, API_KEY_ENV, PORT_ENV};
pub use store::ConfigStore;
pub use types::{CatalogConfig, ClientConfig, Config, ServerConfig};
