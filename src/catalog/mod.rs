//! Third-party movie catalog used by the backend.

mod error;
mod omdb;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{
    require_non_empty, require_poster, RecordType, SchemaViolation, SearchResponse, Validate,
};

pub use error::CatalogError;
pub use omdb::OmdbClient;

/// Detail record of a single movie. Only the fields the backend stores are
/// modelled; the catalog sends many more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    /// Poster URL or the literal "N/A".
    #[serde(rename = "Poster")]
    pub poster: String,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
}

impl Validate for MovieDetails {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_non_empty("imdbID", &self.imdb_id)?;
        require_non_empty("Title", &self.title)?;
        require_non_empty("Year", &self.year)?;
        require_poster("Poster", &self.poster)
    }
}

/// Detail lookup outcome, discriminated by `Response`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "Response")]
pub enum DetailsResponse {
    #[serde(rename = "True")]
    Found(MovieDetails),
    #[serde(rename = "False")]
    NotFound {
        #[serde(rename = "Error")]
        error: String,
    },
}

impl Validate for DetailsResponse {
    fn validate(&self) -> Result<(), SchemaViolation> {
        match self {
            DetailsResponse::Found(details) => details.validate(),
            DetailsResponse::NotFound { error } => require_non_empty("Error", error),
        }
    }
}

/// Read-only access to the movie catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// One page (10 items) of movies whose title matches `title`.
    async fn search_by_title(&self, title: &str, page: u32)
        -> Result<SearchResponse, CatalogError>;

    /// Full record of one movie. An unknown id is an error here.
    async fn get_by_imdb_id(&self, imdb_id: &str) -> Result<MovieDetails, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decode;
    use serde_json::json;

    #[test]
    fn test_details_ignore_extra_fields() {
        let response: DetailsResponse = decode(json!({
            "Response": "True",
            "imdbID": "tt0096895",
            "Title": "Batman",
            "Year": "1989",
            "Rated": "PG-13",
            "Poster": "https://m.media-amazon.com/images/M/batman89.jpg",
            "Type": "movie",
            "Ratings": [{"Source": "Internet Movie Database", "Value": "7.5/10"}]
        }))
        .unwrap();

        match response {
            DetailsResponse::Found(details) => {
                assert_eq!(details.title, "Batman");
                assert_eq!(details.year, "1989");
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn test_details_not_found() {
        let response: DetailsResponse = decode(json!({
            "Response": "False",
            "Error": "Incorrect IMDb ID."
        }))
        .unwrap();
        assert_eq!(
            response,
            DetailsResponse::NotFound {
                error: "Incorrect IMDb ID.".to_string()
            }
        );
    }

    #[test]
    fn test_details_reject_bad_poster() {
        let result = decode::<DetailsResponse>(json!({
            "Response": "True",
            "imdbID": "tt0096895",
            "Title": "Batman",
            "Year": "1989",
            "Poster": "",
            "Type": "movie"
        }));
        assert!(result.is_err());
    }
}
