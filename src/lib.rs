//! Movie search and favorites tracker.
//!
//! The [`store`] module is the client-side engine: a reactive state
//! container driving paginated, cancellable searches and keeping the
//! favorites list in sync after mutations. [`server`] is the backend it
//! talks to, and [`catalog`] the third-party movie catalog behind it.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod store;
