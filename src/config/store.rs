//! Thread-safe configuration storage.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::types::Config;

/// Shared config container; clones read the same config concurrently.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<Config>>,
}

impl ConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Get a clone of the current config.
    pub fn get(&self) -> Config {
        self.inner.read().clone()
    }
}
