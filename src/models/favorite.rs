use serde::{Deserialize, Serialize};

use super::schema::{require_non_empty, require_poster, SchemaViolation, Validate};

/// A movie persisted server-side with an upvote counter.
///
/// Identity is `imdb_id`; records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMovie {
    /// Unique movie id, e.g. "tt5024912".
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    /// Release year as reported by the catalog, e.g. "1990".
    pub release_year: String,
    /// Poster URL or the literal "N/A".
    pub poster_url: String,
    /// Upvotes from all users.
    pub upvotes: u64,
}

impl Validate for FavoriteMovie {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_non_empty("imdbID", &self.imdb_id)?;
        require_non_empty("title", &self.title)?;
        require_non_empty("releaseYear", &self.release_year)?;
        require_poster("posterUrl", &self.poster_url)
    }
}

/// Ordering applied to the favorites list by upvotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DES")]
    Des,
}

impl SortOrder {
    /// Wire form used in the `sortByUpvotes` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Des => "DES",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ASC" => Some(SortOrder::Asc),
            "DES" => Some(SortOrder::Des),
            _ => None,
        }
    }
}
