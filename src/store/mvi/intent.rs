//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent the lifecycle of a remote operation as seen by a
/// cell: it started, it produced a value, it failed, or it was reset.
pub trait Intent: Send + 'static {}
