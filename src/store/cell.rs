//! Per-capability async operation cell.

use std::marker::PhantomData;

use crate::error::ClientError;
use crate::store::mvi::{Intent, Reducer, StoreState};

/// `{loading, error, value}` trio of one store capability.
///
/// `loading` is true only while a request is in flight; `error` is cleared
/// when a new invocation starts; `value` survives until replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncCell<T> {
    pub loading: bool,
    pub error: Option<ClientError>,
    pub value: Option<T>,
}

impl<T> Default for AsyncCell<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            value: None,
        }
    }
}

impl<T> StoreState for AsyncCell<T> where T: Clone + PartialEq + Send + Sync + 'static {}

/// Lifecycle events of a plain request/response operation.
#[derive(Debug, Clone)]
pub enum CellIntent<T> {
    /// Request issued.
    Started,
    /// Request succeeded with a value.
    Resolved(T),
    /// Request failed.
    Failed(ClientError),
}

impl<T: Send + 'static> Intent for CellIntent<T> {}

pub struct CellReducer<T>(PhantomData<T>);

impl<T> Reducer for CellReducer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    type State = AsyncCell<T>;
    type Intent = CellIntent<T>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CellIntent::Started => AsyncCell {
                loading: true,
                error: None,
                value: state.value,
            },
            CellIntent::Resolved(value) => AsyncCell {
                loading: false,
                error: state.error,
                value: Some(value),
            },
            // Superseded operations never touch the cell.
            CellIntent::Failed(ClientError::Cancelled) => state,
            CellIntent::Failed(error) => AsyncCell {
                loading: false,
                error: Some(error),
                value: state.value,
            },
        }
    }
}
