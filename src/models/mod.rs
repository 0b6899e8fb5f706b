//! Wire types shared by the client, the backend and the catalog adapter.

mod envelope;
mod favorite;
mod schema;
mod search;

pub use envelope::{ApiErrorBody, ApiErrorResponse, ApiSuccessResponse};
pub use favorite::{FavoriteMovie, SortOrder};
pub use schema::{decode, SchemaViolation, Validate};
pub(crate) use schema::{require_non_empty, require_poster};
pub use search::{RecordType, SearchQuery, SearchResponse, SearchResultItem, SERVER_PAGE_SIZE};
