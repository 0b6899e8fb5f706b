//! Model-View-Intent primitives used by the store cells.
//!
//! ```text
//! Action ──→ Intent ──→ Reducer ──→ State ──→ Observers
//! ```
//!
//! - **State**: immutable snapshot of one store cell
//! - **Intent**: a lifecycle event of an operation (started, resolved, ...)
//! - **Reducer**: pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::StoreState;
