//! Base trait for store state in MVI architecture.

/// Marker trait for store cell snapshots.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Comparable (PartialEq so no-op updates notify nobody)
/// - Shareable across tasks (Send + Sync)
pub trait StoreState: Clone + PartialEq + Default + Send + Sync + 'static {}
